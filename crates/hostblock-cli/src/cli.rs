//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use hostblock_blocks::UnterminatedPolicy;
use hostblock_core::{EmptyPolicy, SyncSettings};
use hostblock_inventory::InventoryFormat;

/// Write one Ansible inventory group into a tagged block of a hosts file
#[derive(Parser, Debug)]
#[command(name = "hostblock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inventory file to read
    #[arg(short = 'i', long = "ini", value_name = "PATH", env = "HOSTBLOCK_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// Inventory group (section) to extract
    #[arg(short = 's', long = "section", value_name = "GROUP")]
    pub group: Option<String>,

    /// Target file holding the tagged block
    #[arg(short = 'f', long = "file", value_name = "PATH", env = "HOSTBLOCK_TARGET")]
    pub target: Option<PathBuf>,

    /// Tag naming the block in the target file
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Settings file (TOML, JSON or YAML); flags override its values
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Comment prefix of the marker lines ("###" matches older files)
    #[arg(long, value_name = "PREFIX")]
    pub comment_prefix: Option<String>,

    /// Inventory format: auto, ini or yaml
    #[arg(long, value_name = "FORMAT")]
    pub inventory_format: Option<InventoryFormat>,

    /// Host variable holding the address
    #[arg(long, value_name = "VAR")]
    pub address_var: Option<String>,

    /// Text written for hosts with no address
    #[arg(long, value_name = "TEXT")]
    pub missing_address: Option<String>,

    /// When the group has no hosts: skip or write
    #[arg(long, value_name = "POLICY")]
    pub on_empty: Option<EmptyPolicy>,

    /// When the block has no close marker: fail or truncate
    #[arg(long, value_name = "POLICY")]
    pub on_unterminated: Option<UnterminatedPolicy>,

    /// Print the change as a diff without writing the target
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The settings given on the command line.
    pub fn settings(&self) -> SyncSettings {
        SyncSettings {
            inventory: self.inventory.clone(),
            inventory_format: self.inventory_format,
            group: self.group.clone(),
            target: self.target.clone(),
            tag: self.tag.clone(),
            comment_prefix: self.comment_prefix.clone(),
            address_var: self.address_var.clone(),
            missing_address: self.missing_address.clone(),
            on_empty: self.on_empty,
            on_unterminated: self.on_unterminated,
        }
    }
}

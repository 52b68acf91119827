//! The sync run and its dry-run preview

use colored::Colorize;

use hostblock_core::{Preview, SyncConfig, SyncOutcome, SyncSettings, preview, sync};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolve settings from `--config` and flags, then run or preview.
pub fn run_sync(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;

    if cli.dry_run {
        return run_preview(&config);
    }

    println!(
        "{} Start parse file {}",
        "=>".blue().bold(),
        config.inventory.display().to_string().cyan()
    );

    let report = sync(&config)?;

    if report.outcome == SyncOutcome::Skipped {
        println!(
            "{} No addresses found in group {}; {} left unchanged",
            "SKIP".yellow().bold(),
            config.group.cyan(),
            config.target.display()
        );
        return Ok(());
    }

    println!(
        "{} Parse complete, {} addresses found",
        "OK".green().bold(),
        report.hosts
    );
    if report.outcome == SyncOutcome::Truncated {
        println!(
            "{} Block {} had no close marker; lines after it were discarded",
            "WARN".yellow().bold(),
            config.tag.cyan()
        );
    }
    println!(
        "{} Hosts file generation complete: {}",
        "OK".green().bold(),
        config.target.display().to_string().cyan()
    );

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let settings = match &cli.config {
        Some(path) => SyncSettings::load(path)?.merge(cli.settings()),
        None => cli.settings(),
    };

    settings.into_config().map_err(|e| match e {
        hostblock_core::Error::MissingSetting { name } => CliError::user(format!(
            "Missing required setting '{name}': pass {} or set it in a settings file",
            flag_for(name)
        )),
        other => other.into(),
    })
}

fn flag_for(setting: &str) -> &'static str {
    match setting {
        "inventory" => "-i/--ini",
        "group" => "-s/--section",
        "target" => "-f/--file",
        "tag" => "-t/--tag",
        _ => "the matching flag",
    }
}

fn run_preview(config: &SyncConfig) -> Result<()> {
    let preview = preview(config)?;

    print_existing_blocks(&preview);

    if preview.report.outcome == SyncOutcome::Skipped {
        println!(
            "{} No addresses found in group {}; nothing would change",
            "SKIP".yellow().bold(),
            config.group.cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} addresses found in group {}",
        "=>".blue().bold(),
        preview.report.hosts,
        config.group.cyan()
    );

    if preview.is_unchanged() {
        println!("{} {} is up to date", "OK".green().bold(), config.target.display());
    } else {
        print!("{}", preview.unified_diff());
        println!("{} Dry run: nothing written", "=>".blue().bold());
    }

    Ok(())
}

fn print_existing_blocks(preview: &Preview) {
    if preview.existing.is_empty() {
        println!("{} No tagged blocks in {}", "=>".blue().bold(), preview.target.display());
        return;
    }

    println!("{} Tagged blocks in {}:", "=>".blue().bold(), preview.target.display());
    for block in &preview.existing {
        println!(
            "   {} {} (lines {}-{})",
            "-".dimmed(),
            block.tag.cyan(),
            block.start_line,
            block.end_line
        );
    }
}

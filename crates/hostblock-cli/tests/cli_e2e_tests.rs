//! End-to-end tests that invoke the compiled `hostblock` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVENTORY: &str = "\
[web]
a ansible_host=10.0.0.1
b

[empty]
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(target: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inventory.ini"), INVENTORY).unwrap();
        fs::write(dir.path().join("hosts"), target).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn target_text(&self) -> String {
        fs::read_to_string(self.path("hosts")).unwrap()
    }

    /// `hostblock` with colors off, run inside the workspace.
    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("hostblock").unwrap();
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG")
            .env_remove("HOSTBLOCK_INVENTORY")
            .env_remove("HOSTBLOCK_TARGET");
        cmd
    }

    fn sync(&self, group: &str) -> Command {
        let mut cmd = self.command();
        cmd.args(["-i", "inventory.ini", "-s", group, "-f", "hosts", "-t", group]);
        cmd
    }
}

fn intermediate_exists(dir: &Path) -> bool {
    dir.join("hosts+").exists()
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("hostblock")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--section"));
}

#[test]
fn test_version_banner() {
    let ws = Workspace::new("x\n");

    ws.sync("web")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "hostblock {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_sync_writes_block() {
    let ws = Workspace::new("127.0.0.1 localhost\n");

    ws.sync("web")
        .assert()
        .success()
        .stdout(predicate::str::contains("Start parse file"))
        .stdout(predicate::str::contains("Parse complete, 2 addresses found"))
        .stdout(predicate::str::contains("Hosts file generation complete"));

    assert_eq!(
        ws.target_text(),
        "127.0.0.1 localhost\n# TAG: web {{{\n10.0.0.1\ta\n# no ip\tb\n# TAG: web }}}\n"
    );
    assert!(!intermediate_exists(ws.dir.path()));
}

#[test]
fn test_missing_group_exits_non_zero() {
    let ws = Workspace::new("x\n");

    ws.sync("staging")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Group 'staging' not found"));

    assert_eq!(ws.target_text(), "x\n");
}

#[test]
fn test_missing_target_exits_non_zero() {
    let ws = Workspace::new("x\n");

    ws.command()
        .args(["-i", "inventory.ini", "-s", "web", "-f", "nope", "-t", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Can't read target file"));

    assert!(!ws.path("nope").exists());
}

#[test]
fn test_empty_group_is_skipped() {
    let ws = Workspace::new("x\n");

    ws.sync("empty")
        .assert()
        .success()
        .stdout(predicate::str::contains("No addresses found"));

    assert_eq!(ws.target_text(), "x\n");
}

#[test]
fn test_empty_group_write_policy() {
    let ws = Workspace::new("x\n");

    ws.sync("empty").args(["--on-empty", "write"]).assert().success();

    assert_eq!(ws.target_text(), "x\n# TAG: empty {{{\n# TAG: empty }}}\n");
}

#[test]
fn test_unterminated_block_fails() {
    let original = "x\n# TAG: web {{{\nold\n";
    let ws = Workspace::new(original);

    ws.sync("web")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unterminated block 'web'"));

    assert_eq!(ws.target_text(), original);
    assert!(!intermediate_exists(ws.dir.path()));
}

#[test]
fn test_missing_required_flag_is_user_error() {
    let ws = Workspace::new("x\n");

    ws.command()
        .args(["-i", "inventory.ini", "-s", "web", "-f", "hosts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required setting 'tag'"))
        .stderr(predicate::str::contains("-t/--tag"));
}

#[test]
fn test_config_file_with_flag_override() {
    let ws = Workspace::new("x\n");
    fs::write(
        ws.path("hostblock.toml"),
        "inventory = \"inventory.ini\"\ngroup = \"empty\"\ntarget = \"hosts\"\ntag = \"lan\"\ncomment_prefix = \"###\"\n",
    )
    .unwrap();

    ws.command()
        .args(["--config", "hostblock.toml", "-s", "web"])
        .assert()
        .success();

    assert_eq!(
        ws.target_text(),
        "x\n### TAG: lan {{{\n10.0.0.1\ta\n# no ip\tb\n### TAG: lan }}}\n"
    );
}

#[test]
fn test_dry_run_prints_diff_and_writes_nothing() {
    let original = "x\n# TAG: web {{{\nold\n# TAG: web }}}\n";
    let ws = Workspace::new(original);

    ws.sync("web")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("-old"))
        .stdout(predicate::str::contains("+10.0.0.1\ta"))
        .stdout(predicate::str::contains("web (lines 2-4)"))
        .stdout(predicate::str::contains("Dry run: nothing written"));

    assert_eq!(ws.target_text(), original);
    assert!(!intermediate_exists(ws.dir.path()));
}

#[test]
fn test_dry_run_up_to_date() {
    let ws = Workspace::new("x\n");
    ws.sync("web").assert().success();

    ws.sync("web")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("is up to date"));
}

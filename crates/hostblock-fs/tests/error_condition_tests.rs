//! Tests for error handling under adverse filesystem conditions

use hostblock_fs::{SiblingFile, io};
use tempfile::tempdir;

#[test]
fn read_text_nonexistent_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does_not_exist.ini");

    let result = io::read_text(&path);

    assert!(result.is_err(), "Reading non-existent file should fail");
}

#[test]
fn create_sibling_in_missing_directory_returns_error() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("missing").join("hosts");

    let result = SiblingFile::create(&target);

    assert!(matches!(result, Err(hostblock_fs::Error::Io { .. })));
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn read_text_permission_denied_returns_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("secret.ini");
        fs::write(&file_path, "[web]").unwrap();

        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = io::read_text(&file_path);

        // Restore permissions before assertions (for cleanup)
        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));

        assert!(result.is_err(), "Reading unreadable file should fail");
    }

    #[test]
    fn create_sibling_in_readonly_parent_preserves_target() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();

        let target = parent.join("hosts");
        fs::write(&target, "original").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = SiblingFile::create(&target);

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));

        assert!(
            result.is_err(),
            "Creating the intermediate file should fail in a read-only directory"
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }
}

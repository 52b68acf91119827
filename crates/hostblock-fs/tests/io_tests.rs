use hostblock_fs::{SiblingFile, io, sibling_path};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_sibling_path_appends_plus() {
    assert_eq!(
        sibling_path(Path::new("/etc/hosts")),
        Path::new("/etc/hosts+")
    );
    assert_eq!(sibling_path(Path::new("hosts.txt")), Path::new("hosts.txt+"));
}

#[test]
fn test_commit_replaces_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "original\n").unwrap();

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"updated\n").unwrap();
    sibling.commit().unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "updated\n");
    assert!(!sibling_path(&target).exists());
}

#[test]
fn test_target_untouched_until_commit() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "original\n").unwrap();

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"updated\n").unwrap();
    sibling.flush().unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "original\n");
    assert_eq!(sibling.path(), sibling_path(&target));
    assert_eq!(sibling.target(), target);

    sibling.commit().unwrap();
}

#[test]
fn test_discard_removes_intermediate() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "original\n").unwrap();

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"partial").unwrap();
    sibling.discard().unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "original\n");
    assert!(!sibling_path(&target).exists());
}

#[test]
fn test_commit_creates_missing_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("new-hosts");

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"line\n").unwrap();
    sibling.commit().unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "line\n");
}

#[test]
fn test_commit_onto_directory_leaves_intermediate() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep"), "x").unwrap();

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"data\n").unwrap();
    let result = sibling.commit();

    match result {
        Err(hostblock_fs::Error::Replace { intermediate, .. }) => {
            assert_eq!(intermediate, sibling_path(&target));
            assert_eq!(fs::read_to_string(&intermediate).unwrap(), "data\n");
        }
        other => panic!("expected Replace error, got {other:?}"),
    }
    assert!(target.join("keep").exists());
}

#[test]
fn test_read_text_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("inventory.ini");
    fs::write(&file_path, "[web]\na\n").unwrap();

    assert_eq!(io::read_text(&file_path).unwrap(), "[web]\na\n");
}

#[test]
fn test_open_reader_nonexistent_file() {
    let result = io::open_reader(Path::new("/nonexistent/hosts"));
    assert!(matches!(result, Err(hostblock_fs::Error::Io { .. })));
}

#[cfg(unix)]
#[test]
fn test_commit_keeps_target_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "original\n").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

    let mut sibling = SiblingFile::create(&target).unwrap();
    sibling.write_all(b"updated\n").unwrap();
    sibling.commit().unwrap();

    let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    assert_eq!(fs::read_to_string(&target).unwrap(), "updated\n");
}

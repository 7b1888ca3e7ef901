use std::fs;
use std::path::{Path, PathBuf};

use confsync::discovery::TemplateRecord;
use confsync::error::Error;
use confsync::fsutil::ensure_regular_file;
use confsync::publisher::{publish, replace_file, PublishResult};
use tempfile::TempDir;

fn app_conf() -> TemplateRecord {
    TemplateRecord {
        template_path: PathBuf::from("/templates/etc/app.conf.tmpl"),
        destination_dir: PathBuf::from("/etc"),
        file_name: "app.conf".to_string(),
    }
}

fn staged(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("dist/etc/app.conf");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_publish_creates_missing_destination() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    let source = staged(temp_dir.path(), "port=4589");

    let result = publish(&app_conf(), &source, &live).unwrap();
    assert_eq!(
        result,
        PublishResult { destination: live.join("etc/app.conf"), bytes: 9 }
    );
    assert_eq!(fs::read_to_string(live.join("etc/app.conf")).unwrap(), "port=4589");
}

#[test]
fn test_publish_truncates_longer_destination() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(live.join("etc")).unwrap();
    fs::write(live.join("etc/app.conf"), "port=4589extragarbage").unwrap();
    let source = staged(temp_dir.path(), "port=9999");

    publish(&app_conf(), &source, &live).unwrap();
    assert_eq!(fs::read_to_string(live.join("etc/app.conf")).unwrap(), "port=9999");
}

#[test]
fn test_publish_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    let source = staged(temp_dir.path(), "a=1\nb=2\n");

    publish(&app_conf(), &source, &live).unwrap();
    let first = fs::read(live.join("etc/app.conf")).unwrap();
    publish(&app_conf(), &source, &live).unwrap();
    let second = fs::read(live.join("etc/app.conf")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, b"a=1\nb=2\n");
}

#[test]
fn test_publish_empty_staged_file_empties_destination() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(live.join("etc")).unwrap();
    fs::write(live.join("etc/app.conf"), "old").unwrap();
    let source = staged(temp_dir.path(), "");

    let result = publish(&app_conf(), &source, &live).unwrap();
    assert_eq!(result.bytes, 0);
    assert_eq!(fs::read_to_string(live.join("etc/app.conf")).unwrap(), "");
}

#[test]
fn test_destination_directory_is_not_regular() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(live.join("etc/app.conf")).unwrap();
    let source = staged(temp_dir.path(), "x");

    match publish(&app_conf(), &source, &live) {
        Err(Error::NotRegularFileError { path }) => {
            assert_eq!(path, live.join("etc/app.conf").display().to_string())
        }
        other => panic!("Expected NotRegularFileError, got {:?}", other),
    }
}

#[test]
fn test_parent_that_is_a_file_cannot_be_created() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(&live).unwrap();
    fs::write(live.join("etc"), "not a directory").unwrap();
    let source = staged(temp_dir.path(), "x");

    assert!(matches!(
        publish(&app_conf(), &source, &live),
        Err(Error::DirectoryCreateError { .. })
    ));
}

#[test]
fn test_missing_source_becomes_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("dist/missing.conf");
    let destination = temp_dir.path().join("live/missing.conf");

    let result = replace_file(&source, &destination).unwrap();
    assert_eq!(result.bytes, 0);
    assert!(source.is_file());
    assert!(destination.is_file());
}

#[test]
fn test_ensure_regular_file_keeps_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keep.conf");
    fs::write(&path, "content").unwrap();

    ensure_regular_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

#[cfg(unix)]
#[test]
fn test_publish_writes_through_symlink() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(live.join("etc")).unwrap();
    let target = temp_dir.path().join("real.conf");
    fs::write(&target, "old content").unwrap();
    std::os::unix::fs::symlink(&target, live.join("etc/app.conf")).unwrap();
    let source = staged(temp_dir.path(), "new");

    publish(&app_conf(), &source, &live).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
}

#[cfg(unix)]
#[test]
fn test_uncreatable_destination_is_a_publish_error() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("live");
    fs::create_dir_all(live.join("etc")).unwrap();
    let dangling = temp_dir.path().join("missing-dir/app.conf");
    std::os::unix::fs::symlink(&dangling, live.join("etc/app.conf")).unwrap();
    let source = staged(temp_dir.path(), "x");

    match publish(&app_conf(), &source, &live) {
        Err(Error::PublishError { destination, .. }) => {
            assert_eq!(destination, live.join("etc/app.conf").display().to_string())
        }
        other => panic!("Expected PublishError, got {:?}", other),
    }
    assert!(!dangling.exists());
}

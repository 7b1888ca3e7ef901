//! File system helpers shared by the renderer and the publisher.

use log::debug;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::constants::DIR_MODE;
use crate::error::{Error, Result};

/// Creates `path` and all of its missing parents with mode 0755.
///
/// Succeeds without touching anything when the directory already exists.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }

    debug!("Creating directory {}", path.display());
    create_dir_all(path).map_err(|source| Error::DirectoryCreateError {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(DIR_MODE).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let _ = DIR_MODE;
    fs::create_dir_all(path)
}

/// Makes sure `path` refers to a regular file. Both ends of a publish go through here.
///
/// Missing parents are created and an empty file is created at the leaf when nothing
/// exists there yet. Existing content is never truncated here. Symlinks are followed,
/// so a link pointing at a regular file is accepted.
///
/// # Errors
/// * `Error::DirectoryCreateError` if a parent directory cannot be created
/// * `Error::NotRegularFileError` if the path exists but is not a regular file
/// * `Error::PublishError` if the empty file cannot be created
pub fn ensure_regular_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if fs::metadata(path).is_err() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        debug!("Creating empty file {}", path.display());
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| Error::PublishError {
                destination: path.display().to_string(),
                source,
            })?;
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        _ => Err(Error::NotRegularFileError {
            path: path.display().to_string(),
        }),
    }
}

//! Publishing of staged files onto their live configuration paths.

use log::info;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::discovery::TemplateRecord;
use crate::error::{Error, Result};
use crate::fsutil::ensure_regular_file;

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Live file that was replaced.
    pub destination: PathBuf,
    /// Number of bytes written to it.
    pub bytes: u64,
}

/// Replaces the live file of `record` under `live_root` with the staged file at `staged`.
///
/// Both paths are made to exist as regular files first. The destination is truncated
/// before the copy, so shorter content never leaves stale trailing bytes, and it is
/// synced to storage before this returns.
///
/// # Errors
/// * `Error::DirectoryCreateError` if a missing parent directory cannot be created
/// * `Error::NotRegularFileError` if either path exists but is not a regular file
/// * `Error::PublishError` if opening, copying or syncing fails
pub fn publish<S: AsRef<Path>, L: AsRef<Path>>(
    record: &TemplateRecord,
    staged: S,
    live_root: L,
) -> Result<PublishResult> {
    replace_file(staged.as_ref(), &record.live_path(live_root))
}

/// Copies the full contents of `source` onto `destination`, replacing what was there.
pub fn replace_file(source: &Path, destination: &Path) -> Result<PublishResult> {
    ensure_regular_file(source)?;
    ensure_regular_file(destination)?;

    let publish_error = |e: io::Error| Error::PublishError {
        destination: destination.display().to_string(),
        source: e,
    };

    let mut src = File::open(source).map_err(publish_error)?;
    let mut dest = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(destination)
        .map_err(publish_error)?;

    let bytes = io::copy(&mut src, &mut dest).map_err(publish_error)?;
    dest.sync_all().map_err(publish_error)?;

    info!("Successfully replaced config file: {}", destination.display());
    Ok(PublishResult { destination: destination.to_path_buf(), bytes })
}

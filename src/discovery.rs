//! Template discovery.
//! Walks the template root in lexical order and maps every `*.tmpl` file onto the
//! destination it is staged and published to.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{ROOT_MARKER, TEMPLATE_SUFFIX};
use crate::error::{Error, Result};

/// One discovered template and the destination it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Path of the template file as found during the walk.
    pub template_path: PathBuf,
    /// Directory of the rendered file, relative to a configuration root and
    /// prefixed with the root marker (e.g. `/etc`).
    pub destination_dir: PathBuf,
    /// Template file name without the template suffix.
    pub file_name: String,
}

impl TemplateRecord {
    /// Destination relative to a configuration root, without the root marker.
    pub fn relative_destination(&self) -> PathBuf {
        let dir = self
            .destination_dir
            .strip_prefix(ROOT_MARKER)
            .unwrap_or(&self.destination_dir);
        dir.join(&self.file_name)
    }

    /// Location of the rendered file under the staging root.
    pub fn staged_path<P: AsRef<Path>>(&self, staging_root: P) -> PathBuf {
        staging_root.as_ref().join(self.relative_destination())
    }

    /// Location of the live configuration file under the live root.
    pub fn live_path<P: AsRef<Path>>(&self, live_root: P) -> PathBuf {
        live_root.as_ref().join(self.relative_destination())
    }

    /// Name used to attribute errors to this template.
    pub fn name(&self) -> String {
        self.template_path.display().to_string()
    }
}

/// Strips the template suffix, returning `None` for non-templates and for a bare `.tmpl`.
pub fn destination_file_name(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(TEMPLATE_SUFFIX).filter(|stem| !stem.is_empty())
}

/// Discovers every template under `template_root`.
///
/// Entries are visited sorted by file name at each directory level, so the returned
/// order is reproducible. Symlinks are not followed and non-regular entries are skipped.
///
/// # Errors
/// * `Error::DiscoveryError` if the root does not exist, is not a directory or cannot be read
pub fn discover_templates<P: AsRef<Path>>(template_root: P) -> Result<Vec<TemplateRecord>> {
    let template_root = template_root.as_ref();
    let discovery_error = |reason: String| Error::DiscoveryError {
        root: template_root.display().to_string(),
        reason,
    };

    if !template_root.is_dir() {
        return Err(discovery_error("not an existing directory".to_string()));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(template_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(discovery_error(e.to_string())),
            Err(e) => {
                warn!("Skipping unreadable template entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping template with non UTF-8 name: {}", entry.path().display());
            continue;
        };
        if !file_name.ends_with(TEMPLATE_SUFFIX) {
            continue;
        }
        let Some(destination) = destination_file_name(file_name) else {
            warn!("Skipping template without a file name: {}", entry.path().display());
            continue;
        };

        let relative_dir = entry
            .path()
            .parent()
            .and_then(|dir| dir.strip_prefix(template_root).ok())
            .unwrap_or_else(|| Path::new(""));

        let record = TemplateRecord {
            template_path: entry.path().to_path_buf(),
            destination_dir: Path::new(ROOT_MARKER).join(relative_dir),
            file_name: destination.to_string(),
        };
        debug!(
            "Discovered template {} -> {}",
            record.template_path.display(),
            record.destination_dir.join(&record.file_name).display()
        );
        records.push(record);
    }

    Ok(records)
}

//! Directory enumeration behind a provider trait.
//!
//! The OS adapter maps platform metadata onto the normalized
//! [`Attributes`] set and keeps enumeration failures per-entry: a name
//! that cannot be fully stat'd still shows up with zeroed fields instead
//! of silently disappearing.

use std::fs::{self, Metadata};
use std::io;
use std::time::UNIX_EPOCH;

use thiserror::Error;

use crate::path::VPath;
use crate::{Attributes, DirectoryListing, FileEntry};

/// Errors from listing a directory. Per-path and non-fatal; the caller
/// reports and moves on.
#[derive(Debug, Error)]
pub enum ListError {
    /// The path does not resolve to an accessible directory.
    #[error("cannot access '{path}': {source}")]
    NotFound {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Fills a listing with one entry per filesystem object in a directory.
pub trait DirectoryProvider {
    fn list(&self, path: &VPath) -> Result<DirectoryListing, ListError>;
}

/// Provider backed by `std::fs`.
#[derive(Debug, Default)]
pub struct OsDirectoryProvider;

impl DirectoryProvider for OsDirectoryProvider {
    fn list(&self, path: &VPath) -> Result<DirectoryListing, ListError> {
        let read_dir = fs::read_dir(path.as_str()).map_err(|source| ListError::NotFound {
            path: path.as_str().to_string(),
            source,
        })?;

        // read_dir omits the dot entries the platform enumeration APIs
        // yield, so they are synthesized here and take the same
        // filter/sort path as everything else.
        let mut entries = vec![
            dot_entry(".", path.as_str()),
            dot_entry("..", &format!("{}/..", path.as_str())),
        ];

        for item in read_dir {
            let item = match item {
                Ok(item) => item,
                Err(_) => continue,
            };
            let name = item.file_name().to_string_lossy().into_owned();
            let entry = match fs::symlink_metadata(item.path()) {
                Ok(metadata) => entry_from_metadata(name, &metadata),
                Err(_) => best_effort_entry(name),
            };
            entries.push(entry);
        }

        Ok(DirectoryListing {
            path: path.clone(),
            entries,
        })
    }
}

fn dot_entry(name: &str, stat_path: &str) -> FileEntry {
    match fs::metadata(stat_path) {
        Ok(metadata) => entry_from_metadata(name.to_string(), &metadata),
        Err(_) => FileEntry {
            name: name.to_string(),
            bytes: 0,
            attributes: Attributes::DIRECTORY | Attributes::HIDDEN,
            modified: UNIX_EPOCH,
        },
    }
}

fn entry_from_metadata(name: String, metadata: &Metadata) -> FileEntry {
    FileEntry {
        attributes: attributes_for(&name, metadata),
        bytes: metadata.len(),
        modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        name,
    }
}

/// A stat failure still yields a visible entry with zeroed fields.
fn best_effort_entry(name: String) -> FileEntry {
    let attributes = if name.starts_with('.') {
        Attributes::HIDDEN
    } else {
        Attributes::empty()
    };
    FileEntry {
        name,
        bytes: 0,
        attributes,
        modified: UNIX_EPOCH,
    }
}

#[cfg(unix)]
fn attributes_for(name: &str, metadata: &Metadata) -> Attributes {
    use std::os::unix::fs::PermissionsExt;

    let mut attributes = Attributes::empty();
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        attributes |= Attributes::DIRECTORY;
    }
    if file_type.is_file() {
        attributes |= Attributes::REGULAR;
    }
    // No native hidden flag on unix; the dot prefix is the convention.
    if name.starts_with('.') {
        attributes |= Attributes::HIDDEN;
    }
    if metadata.permissions().readonly() {
        attributes |= Attributes::READ_ONLY;
    }
    if metadata.permissions().mode() & 0o100 != 0 {
        attributes |= Attributes::EXECUTABLE;
    }
    attributes
}

#[cfg(windows)]
fn attributes_for(name: &str, metadata: &Metadata) -> Attributes {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_READONLY: u32 = 0x01;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x02;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x04;

    let mut attributes = Attributes::empty();
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        attributes |= Attributes::DIRECTORY;
    }
    if file_type.is_file() {
        attributes |= Attributes::REGULAR;
    }
    let raw = metadata.file_attributes();
    if raw & FILE_ATTRIBUTE_HIDDEN != 0 || name.starts_with('.') {
        attributes |= Attributes::HIDDEN;
    }
    if raw & FILE_ATTRIBUTE_READONLY != 0 {
        attributes |= Attributes::READ_ONLY;
    }
    if raw & FILE_ATTRIBUTE_SYSTEM != 0 {
        attributes |= Attributes::SYSTEM;
    }
    let lowered = name.to_ascii_lowercase();
    if lowered.ends_with(".exe") || lowered.ends_with(".bat") || lowered.ends_with(".cmd") {
        attributes |= Attributes::EXECUTABLE;
    }
    attributes
}

//! Shared types and helpers for the lister binary.
//!
//! The listing pipeline is: enumerate a directory through a
//! [`provider::DirectoryProvider`], drop uninteresting entries with
//! [`filter_entries`], order them with [`sort::sort_entries`], and render
//! the result with the functions in [`render`].

pub mod cli;
pub mod path;
pub mod provider;
pub mod render;
pub mod sort;

use std::time::SystemTime;

use bitflags::bitflags;

use crate::path::VPath;
use crate::sort::SortKey;

bitflags! {
    /// Platform-normalized attributes of a directory entry. Several flags
    /// may be set at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Attributes: u32 {
        const REGULAR    = 0x1;
        const DIRECTORY  = 0x2;
        const HIDDEN     = 0x4;
        const READ_ONLY  = 0x8;
        const SYSTEM     = 0x10;
        const EXECUTABLE = 0x20;
    }
}

/// One filesystem object within a listed directory.
///
/// `bytes` is only meaningful when the entry is not a directory; for
/// directories it holds whatever the platform reports. The modification
/// timestamp stays opaque until render time.
#[derive(Clone, Debug)]
pub struct FileEntry {
    pub name: String,
    pub bytes: u64,
    pub attributes: Attributes,
    pub modified: SystemTime,
}

/// A directory's entries together with the path they were read from.
///
/// Entry order reflects provider enumeration order until the sorter runs.
#[derive(Clone, Debug)]
pub struct DirectoryListing {
    pub path: VPath,
    pub entries: Vec<FileEntry>,
}

/// Output mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Multi-column grid packed into the line width.
    Wide,
    /// One line per entry: size, modification time, name.
    Long,
}

/// Immutable display configuration, built once before any path is listed.
#[derive(Clone, Debug)]
pub struct Config {
    pub show_all: bool,
    pub format: Format,
    pub sort_key: SortKey,
    pub line_width: usize,
    pub show_header: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_all: false,
            format: Format::Wide,
            sort_key: SortKey::Name,
            line_width: 80,
            show_header: false,
            color: false,
        }
    }
}

/// An entry is skipped by default when it carries the hidden attribute or
/// its name starts with a dot, which also covers `.` and `..`.
pub fn is_interesting(entry: &FileEntry, show_all: bool) -> bool {
    if show_all {
        return true;
    }
    !(entry.attributes.contains(Attributes::HIDDEN) || entry.name.starts_with('.'))
}

/// Drop uninteresting entries in place, preserving the relative order of
/// the survivors.
pub fn filter_entries(listing: &mut DirectoryListing, show_all: bool) {
    listing.entries.retain(|entry| is_interesting(entry, show_all));
}

const KB: u64 = 1000;
const MB: u64 = 1000 * KB;
const GB: u64 = 1000 * MB;

/// Format a byte count into the fixed-width column used by the long
/// format.
///
/// Suffixes are decimal (1000-based); values below 10 units keep one
/// decimal place. Every result occupies 5 visual columns, leading space
/// included.
pub fn format_size(bytes: u64) -> String {
    let (value, suffix) = if bytes >= GB {
        (bytes as f32 / GB as f32, Some('G'))
    } else if bytes >= MB {
        (bytes as f32 / MB as f32, Some('M'))
    } else if bytes >= KB {
        (bytes as f32 / KB as f32, Some('K'))
    } else {
        (bytes as f32, None)
    };

    match suffix {
        Some(s) if value >= 100.0 => format!(" {}{}", value as u64, s),
        Some(s) if value >= 10.0 => format!("  {}{}", value as u64, s),
        Some(s) => format!(" {:.1}{}", value, s),
        None => format!(" {:>4}", bytes),
    }
}

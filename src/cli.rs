//! CLI argument definitions for the lister binary.

use clap::Parser;

use crate::sort::SortKey;
use crate::{Config, Format};

/// Arguments for `lister` — the directory listing tool.
#[derive(Parser, Debug)]
#[command(
    name = "lister",
    about = "List directories as a colorized grid or a detailed per-line report",
    after_help = "\
Examples:
  lister
  lister -l ~/projects
  lister -a -t /var/log
  lister -X src tests -w 100"
)]
pub struct ListerArgs {
    /// Directories to list; the current directory when omitted
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Do not skip hidden and dot-prefixed entries
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Long listing format: size, modification time, name
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// Sort by modification time, newest first
    #[arg(short = 't', conflicts_with = "extension_sort")]
    pub time_sort: bool,

    /// Sort by file extension
    #[arg(short = 'X')]
    pub extension_sort: bool,

    /// Output width in columns; detected from the terminal when omitted
    #[arg(short = 'w', long = "width", value_name = "COLS", env = "COLUMNS")]
    pub width: Option<usize>,
}

impl ListerArgs {
    /// Fold the flag set into the immutable display configuration.
    pub fn to_config(&self, detected_width: usize, color: bool) -> Config {
        Config {
            show_all: self.all,
            format: if self.long { Format::Long } else { Format::Wide },
            sort_key: if self.time_sort {
                SortKey::Time
            } else if self.extension_sort {
                SortKey::Extension
            } else {
                SortKey::Name
            },
            line_width: self.width.unwrap_or(detected_width),
            show_header: self.paths.len() > 1,
            color,
        }
    }
}

//! Output rendering: local-time conversion, colorized names, and the wide
//! and long formats.
//!
//! Everything writes through a generic `io::Write` so tests can capture
//! output in a buffer. Padding is computed from the unstyled display
//! length, so color escapes never disturb column alignment.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Local, TimeZone, Timelike};

use crate::{format_size, Attributes, Config, DirectoryListing, FileEntry, Format};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DIR_COLOR: (u8, u8, u8) = (0x00, 0x84, 0xD4);
const EXEC_COLOR: (u8, u8, u8) = (0x56, 0xDB, 0x3A);

/// Calendar and time-of-day fields in local time, derived only at render
/// time and never stored on an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

/// Convert a raw modification timestamp to local calendar time.
///
/// Conversion failures degrade to the zeroed record; a listing never
/// aborts over one bad timestamp.
pub fn local_time(timestamp: SystemTime) -> LocalTime {
    let Ok(elapsed) = timestamp.duration_since(UNIX_EPOCH) else {
        return LocalTime::default();
    };
    match Local
        .timestamp_opt(elapsed.as_secs() as i64, elapsed.subsec_nanos())
        .single()
    {
        Some(time) => LocalTime {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            millisecond: time.timestamp_subsec_millis(),
        },
        None => LocalTime::default(),
    }
}

fn month_abbr(month: u32) -> &'static str {
    MONTHS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}

/// On-screen width of a rendered name: its character count plus the
/// quoting overhead for names containing spaces.
pub fn display_length(name: &str) -> usize {
    let length = name.chars().count();
    if name.contains(' ') {
        length + 2
    } else {
        length
    }
}

/// Quote names containing spaces and color by attribute precedence:
/// directory, then executable, then plain. Only the name itself is
/// colored, never the padding around it.
pub fn render_name(entry: &FileEntry, color: bool) -> String {
    let name = if entry.name.contains(' ') {
        // Embedded single quotes are not escaped.
        format!("'{}'", entry.name)
    } else {
        entry.name.clone()
    };
    if !color {
        return name;
    }
    if entry.attributes.contains(Attributes::DIRECTORY) {
        paint(DIR_COLOR, &name)
    } else if entry.attributes.contains(Attributes::EXECUTABLE) {
        paint(EXEC_COLOR, &name)
    } else {
        name
    }
}

fn paint((r, g, b): (u8, u8, u8), text: &str) -> String {
    format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
}

/// Pack entries into a column-major grid bounded by the configured line
/// width.
pub fn print_wide(
    out: &mut impl Write,
    listing: &DirectoryListing,
    config: &Config,
) -> io::Result<()> {
    let entries = &listing.entries;
    if entries.is_empty() {
        return Ok(());
    }

    let max_length = entries
        .iter()
        .map(|e| display_length(&e.name))
        .max()
        .unwrap_or(0);
    let column_width = max_length + 2;

    let mut columns = config.line_width / column_width;
    if columns == 0 {
        columns = 1;
    }
    let mut rows = entries.len() / columns;
    if rows == 0 {
        rows = 1;
    }
    // Recomputing against the row count tracks the entry count instead of
    // leaving a sparse trailing row when the division above was inexact.
    columns = entries.len() / rows;

    for row in 0..rows {
        let mut index = row;
        for column in 0..columns {
            if index >= entries.len() {
                break;
            }
            let entry = &entries[index];
            out.write_all(render_name(entry, config.color).as_bytes())?;
            if column + 1 < columns {
                // A single row needs only minimal separation, not full
                // column alignment.
                let padding = if rows == 1 {
                    2
                } else {
                    column_width - display_length(&entry.name)
                };
                out.write_all(" ".repeat(padding).as_bytes())?;
            }
            index += rows;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One line per entry: size, month abbreviation, day, zero-padded time,
/// name.
pub fn print_long(
    out: &mut impl Write,
    listing: &DirectoryListing,
    config: &Config,
) -> io::Result<()> {
    for entry in &listing.entries {
        let time = local_time(entry.modified);
        writeln!(
            out,
            "{} {} {:>2} {:02}:{:02} {}",
            format_size(entry.bytes),
            month_abbr(time.month),
            time.day,
            time.hour,
            time.minute,
            render_name(entry, config.color),
        )?;
    }
    Ok(())
}

/// Print one listing: the source-path header when configured, then the
/// selected format.
pub fn print_listing(
    out: &mut impl Write,
    listing: &DirectoryListing,
    config: &Config,
) -> io::Result<()> {
    if config.show_header {
        if listing.path.as_str().contains(' ') {
            writeln!(out, "'{}':", listing.path)?;
        } else {
            writeln!(out, "{}:", listing.path)?;
        }
    }
    match config.format {
        Format::Wide => print_wide(out, listing, config),
        Format::Long => print_long(out, listing, config),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::path::VPath;

    use super::*;

    fn entry(name: &str, attributes: Attributes) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            bytes: 0,
            attributes,
            modified: UNIX_EPOCH,
        }
    }

    fn listing(names: &[&str]) -> DirectoryListing {
        DirectoryListing {
            path: VPath::new("/test"),
            entries: names.iter().map(|n| entry(n, Attributes::REGULAR)).collect(),
        }
    }

    fn wide_to_string(listing: &DirectoryListing, config: &Config) -> String {
        let mut out = Vec::new();
        print_wide(&mut out, listing, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    // Tests for local_time()
    #[test]
    fn test_local_time_pre_epoch_degrades_to_zero() {
        let before = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(local_time(before), LocalTime::default());
    }

    #[test]
    fn test_local_time_fields_are_in_range() {
        let now = local_time(SystemTime::now());
        assert!(now.year >= 2020);
        assert!((1..=12).contains(&now.month));
        assert!((1..=31).contains(&now.day));
        assert!(now.hour <= 23);
        assert!(now.minute <= 59);
    }

    #[test]
    fn test_month_abbr_handles_zeroed_record() {
        assert_eq!(month_abbr(1), "Jan");
        assert_eq!(month_abbr(12), "Dec");
        assert_eq!(month_abbr(0), "???");
    }

    // Tests for render_name() / display_length()
    #[test]
    fn test_display_length_counts_quoting_overhead() {
        assert_eq!(display_length("plain"), 5);
        assert_eq!(display_length("has space"), 11);
    }

    #[test]
    fn test_render_name_quotes_spaces() {
        let spaced = entry("has space", Attributes::REGULAR);
        let rendered = render_name(&spaced, false);
        assert_eq!(rendered, "'has space'");
        assert_eq!(rendered.chars().count(), spaced.name.chars().count() + 2);
    }

    #[test]
    fn test_render_name_colors_by_attribute() {
        let dir = entry("Dir", Attributes::DIRECTORY);
        assert_eq!(render_name(&dir, true), "\x1b[38;2;0;132;212mDir\x1b[0m");

        let exe = entry("tool", Attributes::REGULAR | Attributes::EXECUTABLE);
        assert_eq!(render_name(&exe, true), "\x1b[38;2;86;219;58mtool\x1b[0m");

        let plain = entry("notes", Attributes::REGULAR);
        assert_eq!(render_name(&plain, true), "notes");
    }

    #[test]
    fn test_render_name_directory_wins_over_executable() {
        let both = entry("Dir", Attributes::DIRECTORY | Attributes::EXECUTABLE);
        assert!(render_name(&both, true).starts_with("\x1b[38;2;0;132;212m"));
    }

    #[test]
    fn test_render_name_without_color_has_no_escapes() {
        let dir = entry("Dir", Attributes::DIRECTORY);
        assert_eq!(render_name(&dir, false), "Dir");
    }

    // Tests for print_wide()
    #[test]
    fn test_wide_single_row_uses_two_space_separation() {
        let listing = listing(&["a", "bb", "ccc"]);
        let config = Config {
            line_width: 80,
            ..Config::default()
        };
        assert_eq!(wide_to_string(&listing, &config), "a  bb  ccc\n");
    }

    #[test]
    fn test_wide_grid_is_column_major() {
        // column_width = 3, so a width of 6 gives 2 columns and 2 rows:
        // the first column holds indices 0..rows, the second the rest.
        let listing = listing(&["a", "b", "c", "d"]);
        let config = Config {
            line_width: 6,
            ..Config::default()
        };
        assert_eq!(wide_to_string(&listing, &config), "a  c\nb  d\n");
    }

    #[test]
    fn test_wide_narrow_width_falls_back_to_one_column() {
        let listing = listing(&["alpha", "beta"]);
        let config = Config {
            line_width: 3,
            ..Config::default()
        };
        assert_eq!(wide_to_string(&listing, &config), "alpha\nbeta\n");
    }

    #[test]
    fn test_wide_empty_listing_prints_nothing() {
        let listing = listing(&[]);
        let config = Config::default();
        assert_eq!(wide_to_string(&listing, &config), "");
    }

    // Tests for print_long()
    #[test]
    fn test_long_line_shape() {
        let mut listing = listing(&["file.txt"]);
        listing.entries[0].bytes = 1_500;
        listing.entries[0].modified = SystemTime::now();
        let mut out = Vec::new();
        print_long(&mut out, &listing, &Config::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(" 1.5K "));
        assert!(text.ends_with(" file.txt\n"));
        // Zero-padded HH:MM occupies a fixed position.
        let time_field = &text[13..18];
        assert_eq!(time_field.as_bytes()[2], b':');
    }

    // Tests for print_listing()
    #[test]
    fn test_header_printed_when_configured() {
        let listing = listing(&["a"]);
        let config = Config {
            show_header: true,
            ..Config::default()
        };
        let mut out = Vec::new();
        print_listing(&mut out, &listing, &config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/test:\na\n");
    }

    #[test]
    fn test_header_quotes_paths_with_spaces() {
        let mut listing = listing(&["a"]);
        listing.path = VPath::new("/with space");
        let config = Config {
            show_header: true,
            ..Config::default()
        };
        let mut out = Vec::new();
        print_listing(&mut out, &listing, &config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "'/with space':\na\n");
    }
}

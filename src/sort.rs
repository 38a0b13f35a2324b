//! Entry ordering: three comparators and the stable sort that applies
//! them.
//!
//! Callers always run a Name pass before the selected key, so entries
//! that compare equal under the key keep their name order. The sort is an
//! insertion sort rather than `slice::sort_by`: the comparators'
//! equal-prefix rule means two names can each compare equal to a third
//! while differing from one another, which is not the total order the
//! standard sort is entitled to assume.

use std::cmp::Ordering;

use crate::{DirectoryListing, FileEntry};

/// Sort key selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Extension,
    Time,
}

/// Compare two entries under the given key.
pub fn compare(key: SortKey, a: &FileEntry, b: &FileEntry) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Extension => compare_extensions(&a.name, &b.name),
        // Higher priority is the later modification time.
        SortKey::Time => b.modified.cmp(&a.modified),
    }
}

/// Byte-wise comparison over the shared prefix only. When one name is a
/// prefix of the other the two compare equal; the longer name is not
/// greater.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    for (x, y) in a.bytes().zip(b.bytes()) {
        match x.cmp(&y) {
            Ordering::Equal => continue,
            different => return different,
        }
    }
    Ordering::Equal
}

/// Entries named `.` or `..` sort before everything else; entries without
/// an extension sort before any entry with one; otherwise extensions
/// compare like names.
pub fn compare_extensions(a: &str, b: &str) -> Ordering {
    let a_dot = a == "." || a == "..";
    let b_dot = b == "." || b == "..";
    match (a_dot, b_dot) {
        (true, true) => compare_names(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match (extension(a), extension(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(ea), Some(eb)) => compare_names(ea, eb),
        },
    }
}

/// The substring after the last dot, if any.
fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|index| &name[index + 1..])
}

/// Stable in-place insertion sort under the given key.
pub fn sort_entries(listing: &mut DirectoryListing, key: SortKey) {
    let entries = &mut listing.entries;
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && compare(key, &entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

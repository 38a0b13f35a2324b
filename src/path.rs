//! Owned path values and the OS resolution seam.
//!
//! [`VPath`] is a plain text buffer with the handful of derivations the
//! listing pipeline needs; everything that touches the real filesystem or
//! environment goes through [`PathResolver`] so tests can pin it down.

use std::env;
use std::fmt;
use std::fs;

use thiserror::Error;

/// Errors from path derivation operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The operation has no valid result for this path, e.g. taking the
    /// parent of a path with no separator. Indicates a logic error, not
    /// bad user input.
    #[error("malformed path: '{0}'")]
    Malformed(String),
}

/// An owned, growable filesystem path buffer.
///
/// Holds exactly the logical path text with no implicit terminator.
/// Separators are rewritten to `/` by [`VPath::normalize`]. Mutating
/// operations may reallocate the buffer, so callers must not hold
/// references to the text across them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VPath {
    text: String,
}

impl VPath {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a segment, inserting a separator unless the path already
    /// ends in one.
    pub fn append(&mut self, segment: &str) {
        if !self.text.ends_with('/') && !self.text.ends_with('\\') {
            self.text.push('/');
        }
        self.text.push_str(segment);
    }

    /// The byte range starting at `start`, with `count` clamped to the
    /// remaining length.
    pub fn substring(&self, start: usize, count: usize) -> VPath {
        let start = start.min(self.text.len());
        let end = start.saturating_add(count).min(self.text.len());
        VPath::new(&self.text[start..end])
    }

    /// The path up to the last separator. The root separator is kept when
    /// it is the only one.
    pub fn parent(&self) -> Result<VPath, PathError> {
        match self.text.rfind('/') {
            None => Err(PathError::Malformed(self.text.clone())),
            Some(0) => Ok(VPath::new("/")),
            Some(index) => Ok(VPath::new(&self.text[..index])),
        }
    }

    /// Expand a leading `~` to the resolver's home directory, then rewrite
    /// all backslash separators to forward slashes.
    pub fn normalize(&mut self, resolver: &dyn PathResolver) {
        if self.text.starts_with('~') {
            let mut home = resolver.home_directory();
            let rest = self.text[1..].trim_start_matches(['/', '\\']);
            if !rest.is_empty() {
                home.append(rest);
            }
            self.text = home.text;
        }
        self.text = self.text.replace('\\', "/");
    }

    /// Resolve to a canonical absolute form via the resolver; a no-op when
    /// the path is already absolute.
    pub fn resolve_absolute(&mut self, resolver: &dyn PathResolver) {
        if self.is_relative() {
            *self = resolver.absolute(self);
        }
    }

    /// A path is relative unless it starts with `~` or the platform's
    /// absolute-path marker.
    pub fn is_relative(&self) -> bool {
        if self.text.starts_with('~') {
            return false;
        }
        #[cfg(windows)]
        {
            std::path::Path::new(&self.text).is_relative()
        }
        #[cfg(not(windows))]
        {
            !self.text.starts_with('/')
        }
    }
}

impl fmt::Display for VPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// OS path-resolution operations.
pub trait PathResolver {
    /// Canonical absolute form of `path`. Implementations fall back to the
    /// input when the OS cannot resolve it.
    fn absolute(&self, path: &VPath) -> VPath;

    fn home_directory(&self) -> VPath;

    fn current_directory(&self) -> VPath;
}

/// Resolver backed by the real filesystem and environment.
#[derive(Debug, Default)]
pub struct OsPathResolver;

impl PathResolver for OsPathResolver {
    fn absolute(&self, path: &VPath) -> VPath {
        match fs::canonicalize(path.as_str()) {
            Ok(full) => VPath::new(full.to_string_lossy().replace('\\', "/")),
            Err(_) => path.clone(),
        }
    }

    fn home_directory(&self) -> VPath {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .unwrap_or_default();
        VPath::new(home)
    }

    fn current_directory(&self) -> VPath {
        match env::current_dir() {
            Ok(dir) => VPath::new(dir.to_string_lossy().replace('\\', "/")),
            Err(_) => VPath::new("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubResolver;

    impl PathResolver for StubResolver {
        fn absolute(&self, path: &VPath) -> VPath {
            let mut full = VPath::new("/resolved");
            full.append(path.as_str());
            full
        }

        fn home_directory(&self) -> VPath {
            VPath::new("/home/tester")
        }

        fn current_directory(&self) -> VPath {
            VPath::new("/cwd")
        }
    }

    #[test]
    fn test_append_inserts_separator() {
        let mut path = VPath::new("/home/user");
        path.append("docs");
        assert_eq!(path.as_str(), "/home/user/docs");
    }

    #[test]
    fn test_append_keeps_existing_separator() {
        let mut path = VPath::new("/home/user/");
        path.append("docs");
        assert_eq!(path.as_str(), "/home/user/docs");
    }

    #[test]
    fn test_append_then_parent_round_trips() {
        let original = VPath::new("/home/user");
        let mut path = original.clone();
        path.append("docs");
        assert_eq!(path.parent().unwrap(), original);
    }

    #[test]
    fn test_parent_without_separator_is_malformed() {
        let path = VPath::new("nodir");
        assert_eq!(
            path.parent(),
            Err(PathError::Malformed("nodir".to_string()))
        );
    }

    #[test]
    fn test_parent_keeps_root() {
        let path = VPath::new("/file");
        assert_eq!(path.parent().unwrap().as_str(), "/");
    }

    #[test]
    fn test_substring_clamps_count() {
        let path = VPath::new("abcdef");
        assert_eq!(path.substring(2, 100).as_str(), "cdef");
        assert_eq!(path.substring(10, 5).as_str(), "");
        assert_eq!(path.substring(0, 3).as_str(), "abc");
    }

    #[test]
    fn test_normalize_expands_tilde() {
        let mut path = VPath::new("~");
        path.normalize(&StubResolver);
        assert_eq!(path.as_str(), "/home/tester");

        let mut path = VPath::new("~/docs");
        path.normalize(&StubResolver);
        assert_eq!(path.as_str(), "/home/tester/docs");
    }

    #[test]
    fn test_normalize_rewrites_backslashes() {
        let mut path = VPath::new("C:\\Users\\tester");
        path.normalize(&StubResolver);
        assert_eq!(path.as_str(), "C:/Users/tester");

        let mut path = VPath::new("~\\docs");
        path.normalize(&StubResolver);
        assert_eq!(path.as_str(), "/home/tester/docs");
    }

    #[test]
    fn test_is_relative() {
        assert!(VPath::new("src").is_relative());
        assert!(!VPath::new("~/anything").is_relative());
        #[cfg(not(windows))]
        assert!(!VPath::new("/abs").is_relative());
    }

    #[test]
    fn test_resolve_absolute_is_noop_for_absolute_paths() {
        let mut path = VPath::new("/already/here");
        path.resolve_absolute(&StubResolver);
        assert_eq!(path.as_str(), "/already/here");

        let mut path = VPath::new("relative");
        path.resolve_absolute(&StubResolver);
        assert_eq!(path.as_str(), "/resolved/relative");
    }
}

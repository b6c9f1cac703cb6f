//! Dotted-path handling for nested container access.
//!
//! A path addresses one storage cell in a nested structure: each
//! dot-separated segment names a map key or a list index (`"a.b.0.c"`).
//! Malformed paths (the empty string, or a path with an empty segment such
//! as `"a..b"`) are a local programming error, not a recoverable condition:
//! the splitting helpers panic instead of returning.

/// Returns true if `path` is well-formed: non-empty, with no empty segments.
pub fn is_valid(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(|segment| !segment.is_empty())
}

/// Splits a path into its segments.
///
/// # Panics
/// Panics if the path is empty or contains an empty segment.
pub(crate) fn segments(path: &str) -> std::str::Split<'_, char> {
    assert!(
        is_valid(path),
        "malformed path {path:?}: empty paths and empty segments are not allowed"
    );
    path.split('.')
}

/// Parses a segment as a list index.
pub(crate) fn index(segment: &str) -> Option<usize> {
    segment.parse().ok()
}

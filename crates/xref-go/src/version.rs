//! Version markers and module path escaping in the Go module cache.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// An `@v<digit>` marker at the start of a segment, possibly behind a run of
/// `@`. Group 1 is the marker itself.
pub(crate) static MARKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)@*(@v[0-9])").expect("marker pattern is valid"));

/// Returns true if `segment` has the version-marker shape `@v<digit>...`.
///
/// # Examples
///
/// ```
/// use xref_go::is_version_marker;
///
/// assert!(is_version_marker("@v0.0.1"));
/// assert!(is_version_marker("@v0.0.0-20190519123345-abcdefabcdef"));
/// assert!(!is_version_marker("@23423afasdf"));
/// assert!(!is_version_marker("@@v1.0.0"));
/// assert!(!is_version_marker("vv0.0.0"));
/// ```
pub fn is_version_marker(segment: &str) -> bool {
    segment
        .strip_prefix("@v")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Returns the version carried by a marker segment (`@v1.2.3` → `v1.2.3`).
pub fn marker_version(segment: &str) -> Option<&str> {
    is_version_marker(segment).then(|| &segment[1..])
}

/// Escapes a module path the way the module cache lays it out on disk.
///
/// Uppercase letters become `!` followed by the lowercase letter so that
/// case-insensitive filesystems can hold `BurntSushi` and `burntsushi` side by
/// side. Paths without uppercase letters are returned as-is.
///
/// # Examples
///
/// ```
/// use xref_go::escape_module_path;
///
/// assert_eq!(escape_module_path("github.com/BurntSushi/toml"), "github.com/!burnt!sushi/toml");
/// assert_eq!(escape_module_path("golang.org/x/tools"), "golang.org/x/tools");
/// ```
pub fn escape_module_path(path: &str) -> Cow<'_, str> {
    if !path.chars().any(char::is_uppercase) {
        return Cow::Borrowed(path);
    }

    let mut escaped = String::with_capacity(path.len() + 8);
    for c in path.chars() {
        if c.is_uppercase() {
            escaped.push('!');
            escaped.extend(c.to_lowercase());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

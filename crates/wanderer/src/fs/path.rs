//! Path resolution
//!
//! Paths are handled as segment lists relative to the root: `[]` is `/`,
//! `["home", "user"]` is `/home/user`. Strings typed by the user are turned
//! into segment lists by [`resolve_absolute`].

use std::sync::LazyLock;

use regex::Regex;

use super::FsError;

/// Characters accepted in a typed path: alphanumerics, `.`, `_`, `-`,
/// whitespace and `/`.
static VALID_PATH: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9._\-\s/]*$").unwrap()
});

/// Resolve a typed path against the current path.
///
/// Absolute inputs (leading `/`) start from the root, anything else from
/// `current`. Segments are applied left to right: `..` pops one segment and
/// is a no-op at the root, `.` and empty segments are dropped.
///
/// ```
/// use wanderer::fs::resolve_absolute;
///
/// let cwd = vec!["home".to_string(), "user".to_string()];
/// assert_eq!(resolve_absolute(&cwd, "../..").unwrap(), Vec::<String>::new());
/// assert_eq!(resolve_absolute(&cwd, "/etc/").unwrap(), vec!["etc"]);
/// ```
pub fn resolve_absolute(current: &[String], input: &str) -> Result<Vec<String>, FsError> {
    if !VALID_PATH.is_match(input) {
        return Err(FsError::InvalidPath(input.to_string()));
    }

    let mut segments: Vec<String> = if input.starts_with('/') {
        Vec::new()
    } else {
        current.to_vec()
    };

    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name.to_string()),
        }
    }

    segments.retain(|segment| !segment.is_empty());
    Ok(segments)
}

/// Render segments as an absolute path string.
pub fn path_to_string<S: AsRef<str>>(segments: &[S]) -> String {
    let joined: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
    format!("/{}", joined.join("/"))
}

/// Split a path into its containing folder and final name.
///
/// Returns `None` for the root.
pub fn split_parent(segments: &[String]) -> Option<(&[String], &str)> {
    segments
        .split_last()
        .map(|(name, parent)| (parent, name.as_str()))
}

/// Whether `path` is `ancestor` itself or lies below it.
pub fn is_within(ancestor: &[String], path: &[String]) -> bool {
    path.len() >= ancestor.len() && path[..ancestor.len()] == *ancestor
}

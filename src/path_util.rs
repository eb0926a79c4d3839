use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Characters rejected in profile names and archive suffixes.
///
/// Archives are meant to be portable, so the Windows set is used on every platform.
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Expands a path, replacing a leading `~` with the user's home directory.
///
/// Paths without a leading `~`, or systems without a home directory,
/// are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == OsStr::new("~") => {
            let Some(home) = dirs::home_dir() else {
                return path.to_path_buf();
            };
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                home
            } else {
                home.join(rest)
            }
        }
        _ => path.to_path_buf(),
    }
}

/// Returns the absolute form of `path` without touching the filesystem.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Returns true if `name` contains a character that cannot appear in a file name.
pub fn has_illegal_filename_chars(name: &str) -> bool {
    name.chars()
        .any(|c| c.is_control() || ILLEGAL_FILENAME_CHARS.contains(&c))
}

/// Returns the directory a single file lives in, `.` for bare relative names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

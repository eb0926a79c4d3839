//! Backup profiles.
//!
//! A profile names what to back up (`target`), where archives go (`storage`),
//! how many of them the user wants to keep (`capacity`) and whether archives
//! are compressed. Profiles live in a plain text file the user edits by hand:
//!
//! ```text
//! # Profile name is used as prefix for archives.
//! name example
//!
//! # File or directory to back up.
//! target ~/saves/slot1
//! ```

use crate::error::BackupError;
use crate::path_util::{self, expand_home};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const NAME: &str = "name";
const TARGET: &str = "target";
const STORAGE: &str = "storage";
const CAPACITY: &str = "capacity";
const COMPRESSION: &str = "compression";

/// A named backup configuration, parsed from a profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// File the profile was loaded from.
    pub origin: PathBuf,
    /// Prefix of every archive created from this profile.
    pub name: String,
    /// File or directory to back up.
    pub target: PathBuf,
    /// Directory holding the archives.
    pub storage: PathBuf,
    /// Number of archives the user intends to keep.
    pub capacity: i32,
    /// Deflate archive entries when true, store them as-is otherwise.
    pub compression: bool,
}

impl Profile {
    /// Builds the profile written by `new`.
    ///
    /// It is valid as soon as it is written: it backs up the profile file
    /// itself into the directory next to it.
    pub fn example(origin: &Path) -> Self {
        Self {
            origin: origin.to_path_buf(),
            name: "example".to_string(),
            target: origin.to_path_buf(),
            storage: path_util::parent_dir(origin),
            capacity: 25,
            compression: true,
        }
    }

    /// `target` with `~` expanded.
    pub fn target_path(&self) -> PathBuf {
        expand_home(&self.target)
    }

    /// `storage` with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        expand_home(&self.storage)
    }

    /// Checks the profile against the filesystem and reports every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];
        if self.name.is_empty() {
            issues.push("Profile name is empty.".to_string());
        } else if path_util::has_illegal_filename_chars(&self.name) {
            issues.push("Profile name contains invalid characters.".to_string());
        }
        validate_path(&mut issues, TARGET, &self.target, false);
        validate_path(&mut issues, STORAGE, &self.storage, true);
        if self.capacity < 1 {
            issues.push(format!("Option <{CAPACITY}> must be greater than 0."));
        }
        issues
    }

    /// Renders the profile in the commented text format read by [`Profile::deserialize`].
    pub fn serialize(&self) -> String {
        let mut text = String::new();
        write_entry(
            &mut text,
            NAME,
            &self.name,
            "Profile name is used as prefix for archives.",
        );
        write_entry(
            &mut text,
            TARGET,
            &self.target.display(),
            "File or directory to back up.",
        );
        write_entry(
            &mut text,
            STORAGE,
            &self.storage.display(),
            "Directory where archives are stored.",
        );
        write_entry(
            &mut text,
            CAPACITY,
            &self.capacity,
            "How many archives to keep.",
        );
        write_entry(
            &mut text,
            COMPRESSION,
            &self.compression,
            "Compress archives? Disable for data that is already compressed.",
        );
        text
    }

    /// Parses profile text.
    ///
    /// Blank lines and `#` comments are skipped. Keys are case-insensitive,
    /// the last occurrence of a key wins and missing keys keep their default.
    ///
    /// # Errors
    /// Returns [`BackupError::ProfileFormat`] naming the key for an unknown key
    /// or a value that is not an integer / boolean where one is expected.
    pub fn deserialize(text: &str, origin: &Path) -> Result<Self, BackupError> {
        let profile = Profile {
            origin: origin.to_path_buf(),
            ..Profile::default()
        };
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .try_fold(profile, apply_line)
    }
}

fn apply_line(profile: Profile, line: &str) -> Result<Profile, BackupError> {
    let (key, value) = split_word(line);
    let key = key.to_lowercase();
    let profile = match key.as_str() {
        NAME => Profile {
            name: value.to_string(),
            ..profile
        },
        TARGET => Profile {
            target: PathBuf::from(value),
            ..profile
        },
        STORAGE => Profile {
            storage: PathBuf::from(value),
            ..profile
        },
        CAPACITY => Profile {
            capacity: value
                .parse()
                .map_err(|_| BackupError::format(&key, "must be an integer"))?,
            ..profile
        },
        COMPRESSION => Profile {
            compression: parse_bool(&key, value)?,
            ..profile
        },
        _ => return Err(BackupError::format(&key, "is not recognized")),
    };
    Ok(profile)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, BackupError> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(BackupError::format(key, "must be boolean (true/false)")),
    }
}

fn validate_path(issues: &mut Vec<String>, key: &str, path: &Path, force_directory: bool) {
    if path.as_os_str().is_empty() {
        issues.push(format!("Path to <{key}> is empty."));
        return;
    }
    let path = expand_home(path);
    if !path.exists() {
        issues.push(format!("Path to <{key}> does not exist or is not accessible."));
    } else if force_directory && !path.is_dir() {
        issues.push(format!("Path to <{key}> must be a directory."));
    }
}

fn write_entry(text: &mut String, key: &str, value: &dyn std::fmt::Display, comment: &str) {
    // Writing into a String cannot fail.
    let _ = write!(text, "# {comment}\n{key} {value}\n\n");
}

/// Splits `line` into its first whitespace-delimited word and the trimmed remainder.
pub fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim()),
        None => (line, ""),
    }
}

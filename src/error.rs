//! Recoverable errors of a backup session.
//!
//! Anything listed here is reported to the user as `Error: <message>` and the
//! session continues. Failures outside this taxonomy travel as plain
//! [`anyhow::Error`] and end the process.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BackupError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("Profile does not exist: {}", .0.display())]
    ProfileMissing(PathBuf),

    #[error("Profile option <{key}> {reason}")]
    ProfileFormat { key: String, reason: String },

    #[error("Profile has {} issue(s), type 'profile' for details", .0.len())]
    ProfileInvalid(Vec<String>),

    #[error("Backup target does not exist or is not accessible: {}", .0.display())]
    TargetMissing(PathBuf),

    #[error("Storage directory does not exist or is not accessible: {}", .0.display())]
    StorageMissing(PathBuf),

    #[error("Archive does not exist: {}", .0.display())]
    ArchiveMissing(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Could not open file explorer: {0}")]
    ExplorerUnavailable(String),
}

impl BackupError {
    pub(crate) fn format(key: &str, reason: &str) -> Self {
        BackupError::ProfileFormat {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn arguments(message: &str) -> Self {
        BackupError::InvalidArguments(message.to_string())
    }
}

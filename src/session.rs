//! State of one interactive session.
//!
//! The session remembers which profile file is selected and owns the
//! explorer used to reveal locations. The profile itself is read from disk
//! again by every command that needs it, so hand edits take effect immediately.

use crate::Result;
use crate::error::BackupError;
use crate::explorer::Explorer;
use crate::path_util;
use crate::profile::Profile;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Session {
    profile_path: PathBuf,
    explorer: Box<dyn Explorer>,
}

impl Session {
    pub fn new(profile_path: impl Into<PathBuf>, explorer: Box<dyn Explorer>) -> Self {
        Self {
            profile_path: profile_path.into(),
            explorer,
        }
    }

    /// The profile path as the user gave it.
    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    /// Selects another profile file. Nothing is read until a command needs it.
    pub fn set_profile_path(&mut self, path: impl Into<PathBuf>) {
        self.profile_path = path.into();
        info!(profile = %self.profile_path.display(), "profile selected");
    }

    /// Absolute path of the selected profile file.
    pub fn profile_path_full(&self) -> PathBuf {
        path_util::absolute(&self.profile_path)
    }

    pub fn profile_exists(&self) -> bool {
        self.profile_path_full().is_file()
    }

    pub fn explorer(&self) -> &dyn Explorer {
        self.explorer.as_ref()
    }

    /// Reads and parses the selected profile.
    ///
    /// # Errors
    /// [`BackupError::ProfileMissing`] if there is no profile file,
    /// [`BackupError::ProfileFormat`] if it cannot be parsed.
    pub fn load_profile(&self) -> Result<Profile> {
        let path = self.profile_path_full();
        if !path.is_file() {
            return Err(BackupError::ProfileMissing(path).into());
        }
        let bytes =
            fs::read(&path).with_context(|| format!("Cannot read profile {}", path.display()))?;
        // Invalid UTF-8 is replaced, not rejected.
        let text = String::from_utf8_lossy(&bytes);
        Ok(Profile::deserialize(&text, &path)?)
    }

    /// Reads the selected profile and requires it to pass validation.
    ///
    /// # Errors
    /// As [`Session::load_profile`], plus [`BackupError::ProfileInvalid`]
    /// carrying every issue found.
    pub fn load_valid_profile(&self) -> Result<Profile> {
        let profile = self.load_profile()?;
        let issues = profile.validate();
        if !issues.is_empty() {
            return Err(BackupError::ProfileInvalid(issues).into());
        }
        Ok(profile)
    }

    /// Writes the example profile to the selected path, creating missing
    /// parent directories. An existing file is replaced.
    pub fn reset_profile(&self) -> Result<Profile> {
        let path = self.profile_path_full();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let profile = Profile::example(&path);
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Cannot create profile {}", path.display()))?;
        file.write_all(profile.serialize().as_bytes())?;
        file.flush()?;
        info!(profile = %path.display(), "example profile written");
        Ok(profile)
    }
}

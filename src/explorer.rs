//! Revealing locations in the platform file explorer.

use crate::Result;
use crate::error::BackupError;
use std::io;
use std::path::Path;
use std::process::Command;
use std::thread;
use tracing::{debug, warn};

pub trait Explorer {
    /// Shows `path` to the user. A file is selected inside its parent
    /// directory, a directory is opened.
    fn reveal(&self, path: &Path, is_file: bool) -> Result<()>;
}

/// Launches the file manager of the running platform.
#[derive(Debug, Default)]
pub struct SystemExplorer;

impl Explorer for SystemExplorer {
    fn reveal(&self, path: &Path, is_file: bool) -> Result<()> {
        let command = reveal_command(path, is_file);
        debug!(?command, "launching file explorer");
        launch(command).map_err(|e| BackupError::ExplorerUnavailable(e.to_string()))?;
        Ok(())
    }
}

/// Starts `command` and reaps it on a detached thread, without blocking the caller.
fn launch(mut command: Command) -> io::Result<()> {
    let mut child = command.spawn()?;
    thread::spawn(move || match child.wait() {
        Ok(status) => debug!(%status, "file explorer exited"),
        Err(e) => warn!(error = %e, "cannot wait for file explorer"),
    });
    Ok(())
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path, is_file: bool) -> Command {
    let mut command = Command::new("explorer");
    if is_file {
        let mut arg = std::ffi::OsString::from("/select,");
        arg.push(path);
        command.arg(arg);
    } else {
        command.arg(path);
    }
    command
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path, is_file: bool) -> Command {
    let mut command = Command::new("open");
    if is_file {
        command.arg("-R");
    }
    command.arg(path);
    command
}

/// xdg-open cannot select a file, so the containing directory is opened instead.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(path: &Path, is_file: bool) -> Command {
    let mut command = Command::new("xdg-open");
    if is_file {
        command.arg(crate::path_util::parent_dir(path));
    } else {
        command.arg(path);
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_reveal_file_opens_parent() {
        let command = reveal_command(Path::new("/srv/profiles/game.txt"), true);
        assert_eq!(command.get_program(), "xdg-open");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["/srv/profiles"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_reaps_child() {
        launch(Command::new("true")).unwrap();
        let err = launch(Command::new("pbk-no-such-file-manager")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_reveal_directory() {
        let command = reveal_command(Path::new("/srv/backups"), false);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["/srv/backups"]);
    }
}

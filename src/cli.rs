//! Command-line interface definition for pbk.

use crate::constants::DEFAULT_PROFILE_NAME;
use clap::Parser;
use std::path::PathBuf;

/// Interactive backup tool: store and restore a file or directory as zip archives.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Profile file to start with.
    #[arg(default_value = DEFAULT_PROFILE_NAME)]
    pub profile: PathBuf,
    /// Log filter, e.g. `info` or `pbackup=debug`. `PBK_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let cli = Cli::try_parse_from(["pbk"]).unwrap();
        assert_eq!(cli.profile, PathBuf::from("profile.txt"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_profile_argument() {
        let cli = Cli::try_parse_from(["pbk", "saves/game.txt", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.profile, PathBuf::from("saves/game.txt"));
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_too_many_arguments() {
        assert!(Cli::try_parse_from(["pbk", "a.txt", "b.txt"]).is_err());
    }
}

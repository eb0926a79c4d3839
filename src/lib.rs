//! pbackup: an interactive, low-latency backup tool.
//!
//! A session selects a profile file describing a backup target and a storage
//! directory, then stores and restores timestamped zip archives of the target
//! on command.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod explorer;
pub mod logger;
pub mod path_util;
pub mod profile;
pub mod registry;
pub mod repl;
pub mod session;
pub mod sysexits;
pub mod user_io;

/// Unified result type for all fallible operations in pbackup.
pub type Result<T> = anyhow::Result<T>;

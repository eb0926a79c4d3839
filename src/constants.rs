/// Package name.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Package version.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Profile file used when no path is given on the command line.
pub const DEFAULT_PROFILE_NAME: &str = "profile.txt";
/// Extension of every archive, without the leading dot.
pub const ARCHIVE_EXTENSION: &str = "zip";
/// Prompt shown before each line of input.
pub const PROMPT: &str = ": ";
/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PBK_LOG";

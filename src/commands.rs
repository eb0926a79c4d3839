//! Commands available in a backup session.
//!
//! Every handler follows the same shape: parse the rest of the input line,
//! load the profile from disk when it needs one, call into [`crate::archive`]
//! and report to the user. Problems the user can fix are returned as
//! [`BackupError`] and shown by the session loop.

use crate::Result;
use crate::archive;
use crate::constants::{PKG_NAME, PKG_VERSION};
use crate::error::BackupError;
use crate::path_util;
use crate::registry::{Command, Context, HELP, Outcome, Registry};
use std::env;
use std::path::PathBuf;

/// Builds the registry of every session command, in the order `help` lists them.
pub fn registry() -> Registry {
    Registry::new(vec![
        Command {
            aliases: &[HELP, "?"],
            description: "List all commands or show help for specific command.",
            help: Some(HELP_HELP),
            hidden: false,
            handler: help,
        },
        Command {
            aliases: &["manual"],
            description: "Show quick introduction, recommended for new users.",
            help: None,
            hidden: false,
            handler: manual,
        },
        Command {
            aliases: &["exit"],
            description: "Exit program. Closing the terminal works as well.",
            help: None,
            hidden: false,
            handler: exit,
        },
        Command {
            aliases: &["profile"],
            description: "Display current profile and check for errors.",
            help: Some(
                "'profile [brief]'\n\
                 Show current profile options and check them for errors. \
                 In brief mode only the profile origin is shown, unless there are errors.",
            ),
            hidden: false,
            handler: profile,
        },
        Command {
            aliases: &["switch"],
            description: "Switch current profile.",
            help: Some("'switch <path>'\nSelect the profile file at <path> and check it."),
            hidden: false,
            handler: switch,
        },
        Command {
            aliases: &["new"],
            description: "Create new profile with example settings.",
            help: Some(
                "'new [<path>]'\n\
                 Create (and switch to) a new profile, unless it exists already. \
                 The profile location is revealed in the file explorer.",
            ),
            hidden: false,
            handler: new,
        },
        Command {
            aliases: &["explore", "browse"],
            description: "Open location in file explorer.",
            help: Some(
                "'explore t|s|p|a|cwd'\n\
                 Reveal a location in the file explorer. Possible locations are:\n\
                 * 't' or 'target'\n\
                 * 's' or 'storage'\n\
                 * 'p' or 'profile'\n\
                 * 'a' or 'program'\n\
                 * 'cwd' (current working directory)",
            ),
            hidden: false,
            handler: explore,
        },
        Command {
            aliases: &["find"],
            description: "Find archives matching query.",
            help: Some(
                "'find [<suffix>]'\n\
                 List all archives of the current profile. Specify <suffix> to filter by name. \
                 Archives are sorted by date, most recent last.",
            ),
            hidden: false,
            handler: find,
        },
        Command {
            aliases: &["store", "save"],
            description: "Store target into new archive.",
            help: Some(
                "'store [<suffix>]'\n\
                 Create a new archive from the target and put it into the storage directory. \
                 If <suffix> is given it is added to the archive name; use it as a tag or comment.",
            ),
            hidden: false,
            handler: store,
        },
        Command {
            aliases: &["restore", "load"],
            description: "Restore target from most recent archive.",
            help: Some(
                "'restore [<suffix>]'\n\
                 Restore the target from the most recent archive of the current profile. \
                 Specify <suffix> to pick the most recent archive matching it.",
            ),
            hidden: false,
            handler: restore,
        },
        Command {
            aliases: &["version"],
            description: "Show program version.",
            help: None,
            hidden: true,
            handler: version,
        },
    ])
}

const HELP_HELP: &str =
    "Type 'help [<command>]' or '<command> help' to show help for given command.";

const MANUAL: &[&str] = &[
    "pbackup is a low latency backup manager: store and restore a file or directory with a few keystrokes.",
    "Response time comes first, so features are kept to the bare minimum.",
    "",
    "Everything pbackup needs to know lives in a profile file: the target to archive, \
     the storage directory for archives, and a few options.",
    "Type 'new' to create an example profile and reveal it in the file explorer.",
    "Edit it with your favourite text editor, then type 'profile' to check it.",
    "",
    "Once configured, type 'store' to create an archive and 'restore' to bring the latest one back.",
    "Their short aliases are 'save' and 'load'. Add a word after either to tag or pick archives.",
    "",
    "To manage several profiles, pass a profile path on the command line or type 'switch <path>'.",
];

fn no_arguments(args: &str) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(BackupError::arguments("Too many arguments.").into())
    }
}

fn help(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    let registry = ctx.registry;
    if args.is_empty() {
        ctx.write_line(HELP_HELP)?;
        ctx.write_line("All commands:")?;
        for command in registry.visible() {
            let aliases = command
                .aliases
                .iter()
                .map(|alias| format!("'{alias}'"))
                .collect::<Vec<_>>()
                .join(" or ");
            ctx.write_line(format!("* {aliases}: {}", command.description))?;
        }
        return Ok(Outcome::Continue);
    }

    let Some(command) = registry.find(args) else {
        ctx.write_line(format!("Unknown command '{args}'"))?;
        return Ok(Outcome::Continue);
    };
    if !command.name().eq_ignore_ascii_case(args) {
        ctx.write_line(format!("'{args}' is an alias for '{}'", command.name()))?;
    }
    ctx.write_line(command.help_text())?;
    Ok(Outcome::Continue)
}

fn manual(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    no_arguments(args)?;
    for line in MANUAL {
        ctx.write_line(line)?;
    }
    Ok(Outcome::Continue)
}

fn exit(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    no_arguments(args)?;
    ctx.write_line("Bye!")?;
    Ok(Outcome::Terminate)
}

/// Shows the selected profile and its issues; `brief` hides the options of a healthy profile.
pub fn profile(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    let brief = match args {
        "brief" => true,
        "" => false,
        _ => return Err(BackupError::arguments("The only argument accepted is 'brief'.").into()),
    };

    if !ctx.session.profile_exists() {
        let expected = ctx.session.profile_path_full();
        ctx.write_line("Profile does not exist or is not accessible. Create one to proceed.")?;
        ctx.write_line(format!("* Expected path is {}", expected.display()))?;
        return Ok(Outcome::Continue);
    }
    let profile = ctx.session.load_profile()?;
    let issues = profile.validate();

    ctx.write_line(format!(
        "Profile '{}' @ {}",
        profile.name,
        profile.origin.display()
    ))?;
    if !brief || !issues.is_empty() {
        ctx.write_line(format!("* Target: {}", profile.target.display()))?;
        ctx.write_line(format!("* Storage: {}", profile.storage.display()))?;
        ctx.write_line(format!("* Capacity: {}", profile.capacity))?;
        ctx.write_line(format!("* Compression: {}", profile.compression))?;
    }

    if !issues.is_empty() {
        ctx.write_line("Issues detected:")?;
        for issue in &issues {
            ctx.write_line(format!("* {issue}"))?;
        }
        ctx.write_line("Please fix listed issues before proceeding.")?;
    } else if !brief {
        ctx.write_line("Ok! (Profile has no obvious issues.)")?;
    }
    Ok(Outcome::Continue)
}

fn switch(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    if args.is_empty() {
        return Err(BackupError::arguments("Too few arguments.").into());
    }
    let path = PathBuf::from(args);
    if !path.is_file() {
        return Err(BackupError::FileNotFound(path).into());
    }
    ctx.session.set_profile_path(path);
    profile(ctx, "brief")
}

fn new(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    if !args.is_empty() {
        ctx.session.set_profile_path(args);
    }
    if ctx.session.profile_exists() {
        ctx.write_line("Profile exists already.")?;
        ctx.write_line("Please delete the file manually if you want to reset it.")?;
    } else {
        ctx.session.reset_profile()?;
        ctx.write_line("Profile created.")?;
        ctx.write_line("Please type 'manual' if you need further instructions.")?;
    }
    explore(ctx, "p")
}

fn explore(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    let path = match args.to_lowercase().as_str() {
        "t" | "target" => ctx.session.load_profile()?.target_path(),
        "s" | "storage" => ctx.session.load_profile()?.storage_path(),
        "p" | "profile" => ctx.session.profile_path_full(),
        "a" | "program" => {
            let exe = env::current_exe()?;
            path_util::parent_dir(&exe)
        }
        "cwd" => env::current_dir()?,
        "" => return Err(BackupError::arguments("Too few arguments.").into()),
        _ => return Err(BackupError::arguments("Unknown option.").into()),
    };

    if path.is_file() {
        ctx.session.explorer().reveal(&path, true)?;
    } else if path.is_dir() {
        ctx.session.explorer().reveal(&path, false)?;
    } else {
        ctx.write_line(format!("Path does not exist: {}", path.display()))?;
    }
    Ok(Outcome::Continue)
}

fn find(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    let profile = ctx.session.load_profile()?;
    let names = archive::find_archives(&profile, args)?;
    if names.is_empty() {
        ctx.write_line("Nothing found")?;
    }
    for name in names {
        ctx.write_line(name)?;
    }
    Ok(Outcome::Continue)
}

fn store(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    if path_util::has_illegal_filename_chars(args) {
        let message = "Suffix contains characters not allowed in file names.";
        return Err(BackupError::arguments(message).into());
    }
    let profile = ctx.session.load_valid_profile()?;
    let name = archive::archive_filename(&profile, args);
    ctx.write_line(format!("Creating {name}"))?;
    archive::store(&profile, &name)?;
    ctx.write_line("Done")?;
    Ok(Outcome::Continue)
}

fn restore(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    let profile = ctx.session.load_profile()?;
    let names = archive::find_archives(&profile, args)?;
    let Some(name) = names.last() else {
        ctx.write_line("Found no matching archives!")?;
        return Ok(Outcome::Continue);
    };
    ctx.write_line(format!("Restoring {name}"))?;
    archive::restore(&profile, name)?;
    ctx.write_line("Done")?;
    Ok(Outcome::Continue)
}

fn version(ctx: &mut Context<'_>, args: &str) -> Result<Outcome> {
    no_arguments(args)?;
    ctx.write_line(format!("{PKG_NAME} {PKG_VERSION}"))?;
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aliases_are_unique() {
        let registry = registry();
        let mut seen = HashSet::new();
        for command in registry.visible() {
            for alias in command.aliases {
                assert!(seen.insert(alias.to_lowercase()), "duplicate alias {alias}");
            }
        }
        assert!(registry.find("version").is_some());
        assert!(!seen.contains("version"));
    }

    #[test]
    fn test_registration_order() {
        let names: Vec<_> = registry().visible().map(Command::name).collect();
        assert_eq!(
            names,
            [
                "help", "manual", "exit", "profile", "switch", "new", "explore", "find", "store",
                "restore"
            ]
        );
    }
}

//! Command descriptors and dispatch.
//!
//! A command is an ordered list of case-insensitive aliases (the first one is
//! canonical), a one-line description, optional detailed help and a handler.
//! Input lines are split into a command word and the rest of the line, the
//! word is resolved against every alias and the handler receives the rest.

use crate::Result;
use crate::error::BackupError;
use crate::profile::split_word;
use crate::session::Session;
use crate::user_io::UserIo;
use tracing::debug;

/// Canonical alias of the help command.
pub const HELP: &str = "help";

/// What the session loop does after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Terminate,
}

/// Handler of a command: receives the context and the rest of the input line.
pub type Handler = fn(&mut Context<'_>, &str) -> Result<Outcome>;

pub struct Command {
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub help: Option<&'static str>,
    /// Hidden commands are not listed by `help` and resolve after visible ones.
    pub hidden: bool,
    pub handler: Handler,
}

impl Command {
    pub fn name(&self) -> &'static str {
        self.aliases[0]
    }

    pub fn matches(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    /// Detailed help, or the description when there is none.
    pub fn help_text(&self) -> &'static str {
        self.help.unwrap_or(self.description)
    }
}

/// Ordered set of commands, fixed once the session starts.
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub fn new(commands: Vec<Command>) -> Self {
        debug_assert!(commands.iter().all(|c| !c.aliases.is_empty()));
        Self { commands }
    }

    /// Commands listed by `help`, in registration order.
    pub fn visible(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| !c.hidden)
    }

    /// Resolves `name` against every alias, visible commands first.
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.visible()
            .chain(self.commands.iter().filter(|c| c.hidden))
            .find(|c| c.matches(name))
    }

    pub fn help(&self) -> Option<&Command> {
        self.find(HELP)
    }

    fn is_help_alias(&self, word: &str) -> bool {
        self.help().is_some_and(|help| help.matches(word))
    }
}

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    pub registry: &'a Registry,
    pub session: &'a mut Session,
    io: &'a mut dyn UserIo,
}

impl<'a> Context<'a> {
    pub fn new(registry: &'a Registry, session: &'a mut Session, io: &'a mut dyn UserIo) -> Self {
        Self {
            registry,
            session,
            io,
        }
    }

    pub fn write_line(&mut self, line: impl AsRef<str>) -> Result<()> {
        self.io.write_line(line.as_ref())?;
        Ok(())
    }

    /// Interprets one input line.
    ///
    /// An empty line does nothing. `<command> help` is executed as
    /// `help <command>`.
    ///
    /// # Errors
    /// [`BackupError::UnknownCommand`] if the command word matches no alias,
    /// otherwise whatever the handler returns.
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let registry = self.registry;
        let (name, args) = split_word(line);
        if name.is_empty() {
            return Ok(Outcome::Continue);
        }
        let command = registry
            .find(name)
            .ok_or_else(|| BackupError::UnknownCommand(name.to_string()))?;
        let (command, args) = match registry.help() {
            Some(help) if registry.is_help_alias(args) => (help, name),
            _ => (command, args),
        };
        debug!(command = command.name(), args, "dispatching");
        (command.handler)(self, args)
    }
}

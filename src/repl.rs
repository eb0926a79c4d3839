//! The read-eval-print loop driving a session.

use crate::Result;
use crate::constants::{PKG_NAME, PROMPT};
use crate::error::BackupError;
use crate::registry::{Context, Outcome, Registry};
use crate::session::Session;
use crate::user_io::UserIo;
use std::io;
use tracing::{debug, warn};
use zip::result::ZipError;

/// Reads lines from `io` and dispatches them against `registry` until a
/// command terminates the session or input ends.
///
/// Recoverable errors are printed as `Error: <message>`, filesystem and
/// archive failures as `System error: <message>`, and the loop goes on.
/// Any other error is returned to the caller.
pub struct Repl<I> {
    io: I,
    registry: Registry,
}

impl<I: UserIo> Repl<I> {
    pub fn new(io: I, registry: Registry) -> Self {
        Self { io, registry }
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn into_io(self) -> I {
        self.io
    }

    /// Greets the user and checks the selected profile.
    pub fn welcome(&mut self, session: &mut Session) -> Result<()> {
        self.io.write_line(&format!("Welcome to {PKG_NAME}!"))?;
        self.execute(session, "profile brief")?;
        self.io
            .write_line("Type '?' to list commands, type 'manual' for quick introduction.")?;
        Ok(())
    }

    /// Reads and executes one line. End of input terminates the session.
    pub fn step(&mut self, session: &mut Session) -> Result<Outcome> {
        let Some(line) = self.io.read_line(PROMPT)? else {
            debug!("end of input");
            return Ok(Outcome::Terminate);
        };
        self.execute(session, line.trim())
    }

    /// Runs steps until the session terminates.
    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        while self.step(session)? == Outcome::Continue {}
        Ok(())
    }

    fn execute(&mut self, session: &mut Session, line: &str) -> Result<Outcome> {
        let result = Context::new(&self.registry, session, &mut self.io).execute(line);
        let err = match result {
            Ok(outcome) => return Ok(outcome),
            Err(err) => err,
        };
        if let Some(e) = err.downcast_ref::<BackupError>() {
            warn!(line, error = %e, "command failed");
            self.io.write_line(&format!("Error: {e}"))?;
            return Ok(Outcome::Continue);
        }
        if is_system_error(&err) {
            let message = format!("{err:#}");
            warn!(line, error = %message, "command failed on I/O");
            self.io.write_line(&format!("System error: {message}"))?;
            return Ok(Outcome::Continue);
        }
        Err(err)
    }
}

/// Filesystem and archive failures end the command, not the session.
fn is_system_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<io::Error>() || cause.is::<ZipError>() || cause.is::<walkdir::Error>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;
    use crate::explorer::SystemExplorer;
    use crate::user_io::ScriptedIo;
    use tempfile::tempdir;

    fn run(lines: &[&str]) -> Vec<String> {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().join("profile.txt"), Box::new(SystemExplorer));
        let mut repl = Repl::new(ScriptedIo::new(lines.iter().copied()), commands::registry());
        repl.run(&mut session).unwrap();
        repl.into_io().take_output()
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let output = run(&["frobnicate", "exit now", "exit"]);
        assert_eq!(
            output,
            [
                "Error: Unknown command: frobnicate",
                "Error: Too many arguments.",
                "Bye!"
            ]
        );
    }

    #[test]
    fn test_end_of_input_terminates() {
        assert!(run(&["", "   "]).is_empty());
    }

    #[test]
    fn test_lines_after_exit_are_not_read() {
        let output = run(&["exit", "version"]);
        assert_eq!(output, ["Bye!"]);
    }

    #[test]
    fn test_welcome_without_profile() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().join("profile.txt"), Box::new(SystemExplorer));
        let mut repl = Repl::new(ScriptedIo::default(), commands::registry());
        repl.welcome(&mut session).unwrap();
        let output = repl.io().output();
        assert_eq!(output[0], "Welcome to pbackup!");
        assert!(output[1].contains("does not exist"));
        assert!(output.last().unwrap().contains("'manual'"));
    }
}

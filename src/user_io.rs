//! Terminal access for the session loop.
//!
//! The loop needs three things from its environment: read a line, write a
//! line and wait for a key press. [`ConsoleIo`] talks to the real terminal,
//! [`ScriptedIo`] replays queued input and records output.

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

pub trait UserIo {
    /// Reads one line after showing `prompt`. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Blocks until the user presses any key.
    fn wait_for_key(&mut self) -> io::Result<()>;
}

/// Standard input and output of the process.
#[derive(Debug, Default)]
pub struct ConsoleIo;

impl ConsoleIo {
    pub fn new() -> Self {
        Self
    }
}

impl UserIo for ConsoleIo {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !prompt.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        if !io::stdin().is_terminal() {
            // Piped input has no key presses, a line is the closest thing.
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        let pressed = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
                Ok(_) => continue,
                Err(e) => break Err(e),
            }
        };
        terminal::disable_raw_mode()?;
        pressed
    }
}

/// Replays a fixed list of input lines and captures everything written.
///
/// Prompts are not captured, so [`ScriptedIo::output`] holds exactly the
/// lines a user would read between their own inputs.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedIo {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output: vec![],
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Removes and returns everything written so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

impl UserIo for ScriptedIo {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.extend(line.lines().map(str::to_string));
        if line.is_empty() {
            self.output.push(String::new());
        }
        Ok(())
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        Ok(())
    }
}

use anyhow::Result;
use clap::Parser;
use pbackup::cli::Cli;
use pbackup::explorer::SystemExplorer;
use pbackup::repl::Repl;
use pbackup::session::Session;
use pbackup::user_io::{ConsoleIo, UserIo};
use pbackup::{commands, logger, sysexits};
use std::process;
use tracing::error;

/// Entry point for the pbk interactive session.
/// Parses the command line, then runs the session until the user exits.
fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            let _ = e.print();
            process::exit(sysexits::EX_USAGE);
        }
        e.exit()
    });

    if let Err(e) = logger::init(&cli.log_level) {
        eprintln!("{e}");
        process::exit(sysexits::EX_SOFTWARE);
    }

    let mut session = Session::new(cli.profile, Box::new(SystemExplorer));
    let mut repl = Repl::new(ConsoleIo::new(), commands::registry());
    if let Err(e) = run(&mut repl, &mut session) {
        error!("session crashed: {e:#}");
        let _ = report_crash(repl.into_io(), &e);
        process::exit(sysexits::EX_SOFTWARE);
    }
}

fn run(repl: &mut Repl<ConsoleIo>, session: &mut Session) -> Result<()> {
    repl.welcome(session)?;
    repl.run(session)
}

/// Prints everything known about an error that ended the session and waits
/// for the user to read it.
fn report_crash(mut io: impl UserIo, e: &anyhow::Error) -> Result<()> {
    io.write_line("")?;
    io.write_line("*** Crash log ***")?;
    io.write_line("")?;
    io.write_line(&format!("{e:?}"))?;
    io.write_line("")?;
    io.write_line("Program has crashed. Press any key to exit.")?;
    io.wait_for_key()?;
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use bparc_core::Archive;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "bparc",
    about = "Byte-pair-encoding archiver: pack named files into one compressed container",
    version
)]
struct Cli {
    /// Existing archive file to load before processing commands
    #[arg(short = 'a', long = "archive")]
    archive: Option<PathBuf>,

    /// Script of commands to run instead of reading stdin
    #[arg(short = 's', long = "script")]
    script: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ── Command loop ───────────────────────────────────────────────────────────

enum Outcome {
    Continue,
    Quit,
}

/// Run one command line against the archive.
///
/// Commands: `add FILE`, `remove NAME`, `extract NAME`, `show`,
/// `save FILE`, `quit`. Blank lines and lines starting with `#` are
/// skipped.
fn run_command(archive: &mut Archive, line: &str) -> anyhow::Result<Outcome> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Outcome::Continue);
    };
    if command.starts_with('#') {
        return Ok(Outcome::Continue);
    }
    let argument = words.next();
    if words.next().is_some() {
        anyhow::bail!("Invalid command");
    }

    match (command, argument) {
        ("add", Some(file)) => archive.add(file)?,
        ("remove", Some(name)) => archive.remove(name)?,
        // An extracted file lands in the working directory under its
        // archive name.
        ("extract", Some(name)) => archive.extract(name, name)?,
        ("show", None) => print!("{}", archive.report()),
        ("save", Some(file)) => archive.save(file)?,
        ("quit", None) => return Ok(Outcome::Quit),
        _ => anyhow::bail!("Invalid command"),
    }
    Ok(Outcome::Continue)
}

/// Read and run commands from a script file. The first failing command
/// aborts with a nonzero exit status.
fn script_mode(mut archive: Archive, script: &PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("opening script file {:?}", script))?;
    for line in text.lines() {
        match run_command(&mut archive, line) {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Continue) => {}
            Err(err) => {
                eprintln!("{err:#}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

/// Prompt for and run commands from stdin until `quit` or end of input.
/// A failing command prints its error and reprompts.
fn interactive_mode(mut archive: Archive) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("cmd> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // end of input
        }
        match run_command(&mut archive, &line) {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Continue) => {}
            Err(err) => eprintln!("{err:#}"),
        }
    }
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .expect("logger initialized once");

    let archive = match &cli.archive {
        Some(path) => {
            Archive::load(path).with_context(|| format!("loading archive {:?}", path))?
        }
        None => Archive::new(),
    };

    match &cli.script {
        Some(script) => script_mode(archive, script),
        None => interactive_mode(archive),
    }
}

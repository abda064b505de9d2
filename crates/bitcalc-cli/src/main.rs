//! Bitcalc CLI - evaluate fixed-width integer expressions.

#![allow(clippy::uninlined_format_args)]

mod config;
mod session;

use bitcalc::{CalculationResult, Mode, Screen};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::Config;
use session::{Session, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bitcalc")]
#[command(about = "Programmer calculator for WORD, DWORD and QWORD integers")]
#[command(version)]
struct Cli {
    /// Config file (default: ./bitcalc.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Word size: WORD, DWORD or QWORD (overrides the config file)
    #[arg(short, long, global = true)]
    mode: Option<Mode>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type an expression key by key and evaluate it
    Eval {
        /// Expression, e.g. "32767+1" or "5<<3"
        expr: String,
    },

    /// Type keys and show the line after each one
    Keys {
        /// Keys to press; "=" evaluates
        keys: String,
    },

    /// Read expressions from stdin
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let mode = cli.mode.unwrap_or(config.mode);

    let mut session = match Session::open(&config, mode) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to open history: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Eval { expr } => eval(&mut session, &expr),
        Commands::Keys { keys } => press_keys(&mut session, &keys),
        Commands::Repl => repl(&mut session),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_result(result: &CalculationResult) {
    println!("{} ({})", result.signed_decimal, result.mode);
    println!("  hex: {}", result.hex);
    println!("  oct: {}", result.octal);
    println!("  bin: {}", result.binary);
}

/// Print what the calculator shows. Returns false for an error message.
fn report(screen: &Screen, buffer: &str) -> bool {
    match screen {
        Screen::Result(result) => {
            print_result(result);
            true
        }
        Screen::Message(text) => {
            eprintln!("{}", text);
            false
        }
        Screen::Editing => {
            println!("{}", buffer);
            true
        }
    }
}

fn eval(session: &mut Session, expr: &str) -> Result<bool, SessionError> {
    session.type_text(expr)?;
    let screen = session.evaluate()?.clone();
    Ok(report(&screen, session.calculator().expression().as_str()))
}

fn press_keys(session: &mut Session, keys: &str) -> Result<bool, SessionError> {
    for stroke in session.type_text(keys)? {
        match stroke.outcome.and_then(bitcalc::EditOutcome::reason) {
            Some(reason) => println!("{}  {:<24} rejected: {:?}", stroke.key, stroke.buffer, reason),
            None => println!("{}  {}", stroke.key, stroke.buffer),
        }
    }
    let calc = session.calculator();
    Ok(report(calc.screen(), calc.expression().as_str()))
}

fn repl(session: &mut Session) -> Result<bool, SessionError> {
    let stdin = io::stdin();
    prompt(session.calculator().mode());

    for line in stdin.lock().lines() {
        let line = line.map_err(|source| SessionError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => {}
            (":quit" | ":q", _) => break,
            (":mode", arg) => match arg.trim().parse::<Mode>() {
                Ok(mode) => session.set_mode(mode)?,
                Err(e) => eprintln!("{}", e),
            },
            (":history", arg) => list_history(session, arg.trim()),
            (":clear", _) => {
                let removed = session.clear_history()?;
                println!("removed {} entries", removed);
            }
            (cmd, _) if cmd.starts_with(':') => {
                eprintln!("unknown command {} (try :mode, :history, :clear, :quit)", cmd);
            }
            _ => {
                session.input(line)?;
                let screen = session.evaluate()?.clone();
                let buffer = session.calculator().expression().to_string();
                if !report(&screen, &buffer) || matches!(screen, Screen::Editing) {
                    session.reset()?;
                }
            }
        }
        prompt(session.calculator().mode());
    }
    Ok(true)
}

fn prompt(mode: Mode) {
    print!("{}> ", mode);
    // A failed flush only delays the prompt.
    let _ = io::stdout().flush();
}

fn list_history(session: &Session, arg: &str) {
    let date = if arg.is_empty() {
        None
    } else {
        match arg.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(e) => {
                eprintln!("invalid date {}: {}", arg, e);
                return;
            }
        }
    };
    for entry in session.history(date) {
        println!(
            "{}  {:<6} {} = {}",
            entry.record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.record.mode,
            entry.record.formula,
            entry.record.result
        );
    }
}

//! conch — interactive typed command shell.
//!
//! A thin host around `conch-dispatch`: it builds the registry once at
//! startup (built-ins first, then the default commands), then reads lines
//! from stdin and runs tokenize -> resolve -> execute on each. Resolver
//! errors are printed verbatim; there is no line editing or completion.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use conch_dispatch::prelude::*;
use conch_dispatch::{builtin, docs};

mod greet_cmd;
mod history_cmd;
mod list_cmd;

use history_cmd::History;

#[derive(Parser, Debug)]
#[command(name = "conch", version, about = "Interactive typed command shell")]
struct Cli {
    /// Run a single command line and exit.
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Print the registered command inventory as JSON and exit.
    #[arg(long)]
    dump_commands: bool,

    /// Enable debug logging.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let history: History = Arc::new(Mutex::new(Vec::new()));
    let registry = build_registry(Arc::clone(&history));
    let converter = Converter::new();

    if cli.dump_commands {
        let inventory = docs::describe_registry(&registry);
        println!("{}", serde_json::to_string_pretty(&inventory)?);
        return Ok(());
    }

    if let Some(line) = cli.command.as_deref() {
        let (success, _) = run_line(&registry, &converter, line);
        if !success {
            std::process::exit(1);
        }
        return Ok(());
    }

    repl(&registry, &converter, &history)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Populate the registry deterministically: built-ins first, then the
/// default commands. A factory that fails leaves its command unregistered
/// rather than aborting startup.
fn build_registry(history: History) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    builtin::register_builtins(&mut registry);

    type Factory = Box<dyn Fn() -> std::result::Result<Command, CommandError>>;
    let factories: Vec<(&str, Factory)> = vec![
        ("greet", Box::new(greet_cmd::command)),
        ("list", Box::new(list_cmd::command)),
        (
            "history",
            Box::new(move || history_cmd::command(Arc::clone(&history))),
        ),
    ];

    for (name, factory) in factories {
        match factory() {
            Ok(command) => {
                registry.register(command);
            }
            Err(e) => {
                warn!(command = name, error = %e, "failed to build command; leaving it unregistered");
            }
        }
    }

    registry
}

fn repl(registry: &CommandRegistry, converter: &Converter, history: &History) -> Result<()> {
    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("conch> ");
        io::stdout().flush()?;

        buffer.clear();
        if stdin.lock().read_line(&mut buffer)? == 0 {
            break;
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Ok(mut lines) = history.lock() {
            lines.push(line.to_string());
        }

        let (_, conceal) = run_line(registry, converter, line);
        if conceal {
            if let Ok(mut lines) = history.lock() {
                lines.pop();
            }
        }
    }

    Ok(())
}

/// Dispatch one line. Returns the success flag and whether the executed
/// command asked for its input line to be concealed.
fn run_line(registry: &CommandRegistry, converter: &Converter, line: &str) -> (bool, bool) {
    let resolver = Resolver::new(registry, converter);
    match resolver.resolve_line(line) {
        Ok(invocation) => {
            let result = invocation.execute(registry, &mut StdoutSink);
            if !result.success {
                eprintln!("command failed: {}", invocation.command().name());
            }
            (result.success, invocation.command().conceal_input())
        }
        Err(e) => {
            eprintln!("{e}");
            (false, false)
        }
    }
}

//! The built-in `help` command.
//!
//! With no argument, prints the documentation block of every registered
//! command, alphabetically; with one argument naming a command, only that
//! block. The block format is part of the observable contract:
//!
//! ```text
//! greet
//!     Greet someone.
//!   1  name  String
//!         Who to greet.
//!   2  times  int  | 1 |
//!         Repeat count.
//!   -  loud  boolean  | false |
//!         Shout.
//! ```
//!
//! Ranks are right-aligned to the widest rank; unranked parameters show a
//! dash placeholder of the same width; defaults are pipe-delimited; enum
//! types append their bracketed literal list.

use crate::command::{Command, CommandError, OutputSink};
use crate::invoke::ResolvedValues;
use crate::param::Parameter;
use crate::registry::CommandRegistry;
use crate::types::{TypeDesc, Value};

/// Name of the built-in help command.
pub const NAME: &str = "help";

/// Build the `help` command definition.
pub fn command() -> Result<Command, CommandError> {
    let topic = Parameter::new(
        "command",
        TypeDesc::string(),
        "Name of a single command to document.",
    )?
    .with_ordinal(1)?
    .with_default(Value::Null)?;

    Command::builder(NAME, "Show usage information for the registered commands.")
        .param(topic)
        .action(run)
        .build()
}

fn run(registry: &CommandRegistry, values: &ResolvedValues, sink: &mut dyn OutputSink) -> bool {
    match values.text("command") {
        None => {
            for (i, command) in registry.list().iter().enumerate() {
                if i > 0 {
                    sink.write_line("");
                }
                write_block(command, sink);
            }
            true
        }
        Some(name) => match registry.find(name) {
            Some(command) => {
                write_block(&command, sink);
                true
            }
            None => {
                sink.write_line(&format!("unknown command: '{name}'"));
                false
            }
        },
    }
}

/// Write one command's documentation block to the sink.
pub fn write_block(command: &Command, sink: &mut dyn OutputSink) {
    sink.write_line(command.name());
    for line in command.description().lines() {
        sink.write_line(&format!("    {line}"));
    }

    let width = command
        .ordered_params()
        .filter_map(Parameter::ordinal)
        .max()
        .map(|m| m.to_string().len())
        .unwrap_or(1);

    let unranked = command.params().iter().filter(|p| p.ordinal().is_none());
    for param in command.ordered_params().chain(unranked) {
        sink.write_line(&param_line(param, width));
        for line in param.description().lines() {
            sink.write_line(&format!("        {line}"));
        }
    }
}

fn param_line(param: &Parameter, width: usize) -> String {
    let rank = match param.ordinal() {
        Some(r) => format!("{r:>width$}"),
        None => "-".repeat(width),
    };

    let mut line = format!("  {rank}  {}  {}", param.name(), param.ty().display_name());
    if let Some(default) = param.default() {
        line.push_str(&format!("  | {default} |"));
    }
    if let TypeDesc::Enum(e) = param.ty() {
        line.push_str(&format!("  [{}]", e.literals().join(", ")));
    }
    line
}

//! Typed command-line dispatch for Conch.
//!
//! This crate registers named commands with typed, named/positional
//! parameters, parses a single line of input into a validated invocation,
//! and executes it.
//!
//! # Pipeline
//!
//! ```text
//! raw line -> tokenize -> resolve -> execute
//! ```
//!
//! The tokenizer splits the line into a command name and argument tokens
//! (quoted strings with escapes, brace-delimited array literals, bare
//! tokens). The resolver finds the command in the registry and matches
//! tokens to declared parameters three ways: explicit `name value` pairs,
//! implicit positional values filling ordinal-ranked slots, and the
//! boolean shorthands `--flag` / `--not-flag`. Raw values go through the
//! converter; the result is checked against the command's parameter
//! contract (defaults, duplicates, missing required values) before
//! anything runs.
//!
//! # Defining and dispatching a command
//!
//! ```rust,ignore
//! use conch_dispatch::prelude::*;
//!
//! let greet = Command::builder("greet", "Greet someone.")
//!     .param(Parameter::new("name", TypeDesc::string(), "Who to greet.")?.with_ordinal(1)?)
//!     .param(
//!         Parameter::new("times", TypeDesc::Primitive(Primitive::Int), "Repeat count.")?
//!             .with_ordinal(2)?
//!             .with_default(Value::Int(1))?,
//!     )
//!     .action(|_registry, values, sink| {
//!         for _ in 0..values.int("times").unwrap_or(1) {
//!             sink.write_line(&format!("Hello, {}!", values.text("name").unwrap_or("")));
//!         }
//!         true
//!     })
//!     .build()?;
//!
//! let mut registry = CommandRegistry::new();
//! conch_dispatch::builtin::register_builtins(&mut registry);
//! registry.register(greet);
//!
//! let converter = Converter::new();
//! let resolver = Resolver::new(&registry, &converter);
//! let invocation = resolver.resolve_line("greet \"Ada Lovelace\" 3")?;
//! invocation.execute(&registry, &mut StdoutSink);
//! ```
//!
//! # Registration model
//!
//! The registry is an explicit value owned by the host; hosts populate it
//! deterministically at startup (built-ins first, then their own
//! commands). Registration is first-wins: a colliding name is silently
//! ignored, so built-ins cannot be shadowed. The pipeline is synchronous
//! and single-threaded; registration is not synchronized and belongs in a
//! single initialization phase before parsing begins.

pub mod array;
pub mod builtin;
pub mod collab;
mod command;
mod convert;
pub mod docs;
mod invoke;
mod param;
mod registry;
mod resolver;
pub mod token;
pub mod types;

pub use command::{Command, CommandAction, CommandBuilder, CommandError, OutputSink, StdoutSink};
pub use convert::{ConvertHook, Converter};
pub use invoke::{ExecutionResult, ResolvedInvocation, ResolvedValues, UnknownParameter};
pub use param::{ParamError, Parameter, ParameterValue};
pub use registry::CommandRegistry;
pub use resolver::{ResolveError, Resolver};
pub use token::{tokenize, CommandLine, SyntaxError};

/// Re-export of the common types for host applications.
pub mod prelude {
    pub use crate::array::{ArrayError, ArrayValue};
    pub use crate::types::{EnumType, ObjectType, Primitive, TypeDesc, Value};
    pub use crate::{
        Command, CommandBuilder, CommandError, CommandLine, CommandRegistry, Converter,
        ExecutionResult, OutputSink, ParamError, Parameter, ParameterValue, ResolveError,
        ResolvedInvocation, ResolvedValues, Resolver, StdoutSink, SyntaxError,
    };
}

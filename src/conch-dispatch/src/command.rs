//! Command definitions.
//!
//! A command is built once, registered, and never mutated. Construction
//! normalizes declared parameter ordinals into dense ranks `1..k`, so the
//! resolver's implicit-position scan works over a gap-free sequence
//! regardless of what the declaration used.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::invoke::ResolvedValues;
use crate::param::Parameter;
use crate::registry::CommandRegistry;
use crate::token::is_valid_name;

/// Errors from command construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The command name violates the name grammar.
    #[error("invalid command name: '{name}'")]
    InvalidName { name: String },

    /// Two parameters share a name (case-insensitive).
    #[error("command '{command}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { command: String, parameter: String },

    /// No action callback was supplied.
    #[error("command '{command}' has no action")]
    MissingAction { command: String },

    /// A parameter could not be constructed.
    #[error(transparent)]
    Param(#[from] crate::param::ParamError),
}

/// Sink for a command's textual output.
pub trait OutputSink {
    /// Emit one line of output.
    fn write_line(&mut self, line: &str);
}

/// Collects output lines in memory; used by tests and capture paths.
impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Writes output lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// A command's execution callback.
///
/// Receives the registry (read-only, so listing commands like `help` can
/// enumerate their peers), the resolved value lookup, and an output sink.
/// Returns the success flag; the framework does not interpret anything
/// else about it.
pub type CommandAction =
    Box<dyn Fn(&CommandRegistry, &ResolvedValues, &mut dyn OutputSink) -> bool + Send + Sync>;

/// An immutable command definition.
pub struct Command {
    name: String,
    description: String,
    /// Declaration order; ordinals already normalized to ranks.
    params: Vec<Parameter>,
    /// Lowercased name to position in `params`.
    index: HashMap<String, usize>,
    /// Positions in `params` sorted by rank `1..k`.
    ordered: Vec<usize>,
    conceal_input: bool,
    action: CommandAction,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .field("ordered", &self.ordered)
            .field("conceal_input", &self.conceal_input)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// Start building a command.
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name, description)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the host should drop the input line from its history after
    /// execution (commands that carry secrets on the line).
    pub fn conceal_input(&self) -> bool {
        self.conceal_input
    }

    /// All parameters in declaration order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Look up a parameter by name, case-insensitively.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.param_index(name).map(|i| &self.params[i])
    }

    /// Parameters carrying a rank, in rank order.
    pub fn ordered_params(&self) -> impl Iterator<Item = &Parameter> {
        self.ordered.iter().map(|&i| &self.params[i])
    }

    pub(crate) fn param_index(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }

    pub(crate) fn param_at(&self, index: usize) -> &Parameter {
        &self.params[index]
    }

    pub(crate) fn ordered_indices(&self) -> &[usize] {
        &self.ordered
    }

    pub(crate) fn run_action(
        &self,
        registry: &CommandRegistry,
        values: &ResolvedValues,
        sink: &mut dyn OutputSink,
    ) -> bool {
        (self.action)(registry, values, sink)
    }
}

/// Builder for [`Command`].
pub struct CommandBuilder {
    name: String,
    description: String,
    params: Vec<Parameter>,
    conceal_input: bool,
    action: Option<CommandAction>,
}

impl CommandBuilder {
    /// Start a builder with the command name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            conceal_input: false,
            action: None,
        }
    }

    /// Declare a parameter. Order of declaration is preserved for
    /// documentation; implicit matching uses ordinals only.
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Ask hosts to drop the input line from history after execution.
    pub fn conceal_input(mut self, conceal: bool) -> Self {
        self.conceal_input = conceal;
        self
    }

    /// Supply the execution callback.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&CommandRegistry, &ResolvedValues, &mut dyn OutputSink) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Finish building: validate the name, reject duplicate parameter
    /// names, and normalize ordinals to dense ranks.
    pub fn build(self) -> Result<Command, CommandError> {
        if !is_valid_name(&self.name) {
            return Err(CommandError::InvalidName { name: self.name });
        }

        let Some(action) = self.action else {
            return Err(CommandError::MissingAction { command: self.name });
        };

        let mut params = self.params;
        let mut index = HashMap::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            if index.insert(param.name().to_lowercase(), i).is_some() {
                return Err(CommandError::DuplicateParameter {
                    command: self.name,
                    parameter: param.name().to_string(),
                });
            }
        }

        // Dense re-ranking: gaps and duplicate declared ordinals collapse;
        // the sort is stable, so equal declarations keep declaration order.
        let mut ordered: Vec<usize> = (0..params.len())
            .filter(|&i| params[i].ordinal().is_some())
            .collect();
        ordered.sort_by_key(|&i| params[i].ordinal());
        for (rank, &i) in ordered.iter().enumerate() {
            params[i].set_rank(rank as u32 + 1);
        }

        debug!(
            command = %self.name,
            params = params.len(),
            ranked = ordered.len(),
            "built command"
        );

        Ok(Command {
            name: self.name,
            description: self.description,
            params,
            index,
            ordered,
            conceal_input: self.conceal_input,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, TypeDesc};
    use assert_matches::assert_matches;

    fn param(name: &str, ordinal: Option<u32>) -> Parameter {
        let p = Parameter::new(name, TypeDesc::Primitive(Primitive::Int), "").unwrap();
        match ordinal {
            Some(o) => p.with_ordinal(o).unwrap(),
            None => p,
        }
    }

    fn noop() -> impl Fn(&CommandRegistry, &ResolvedValues, &mut dyn OutputSink) -> bool {
        |_, _, _| true
    }

    #[test]
    fn test_build_minimal() {
        let cmd = Command::builder("go", "Run").action(noop()).build().unwrap();
        assert_eq!(cmd.name(), "go");
        assert!(cmd.params().is_empty());
        assert!(!cmd.conceal_input());
    }

    #[test]
    fn test_invalid_name() {
        assert_matches!(
            Command::builder("bad name", "").action(noop()).build(),
            Err(CommandError::InvalidName { .. })
        );
    }

    #[test]
    fn test_missing_action() {
        assert_matches!(
            Command::builder("go", "").build(),
            Err(CommandError::MissingAction { .. })
        );
    }

    #[test]
    fn test_duplicate_parameter_names() {
        let result = Command::builder("go", "")
            .param(param("count", None))
            .param(param("Count", None))
            .action(noop())
            .build();
        assert_matches!(result, Err(CommandError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_ordinal_gaps_collapse() {
        let cmd = Command::builder("go", "")
            .param(param("third", Some(30)))
            .param(param("first", Some(2)))
            .param(param("unranked", None))
            .param(param("second", Some(7)))
            .action(noop())
            .build()
            .unwrap();

        let ranked: Vec<(&str, Option<u32>)> = cmd
            .ordered_params()
            .map(|p| (p.name(), p.ordinal()))
            .collect();
        assert_eq!(
            ranked,
            vec![("first", Some(1)), ("second", Some(2)), ("third", Some(3))]
        );
        assert_eq!(cmd.param("unranked").unwrap().ordinal(), None);
    }

    #[test]
    fn test_duplicate_ordinals_keep_declaration_order() {
        let cmd = Command::builder("go", "")
            .param(param("a", Some(5)))
            .param(param("b", Some(5)))
            .action(noop())
            .build()
            .unwrap();

        let ranked: Vec<&str> = cmd.ordered_params().map(|p| p.name()).collect();
        assert_eq!(ranked, vec!["a", "b"]);
        assert_eq!(cmd.param("a").unwrap().ordinal(), Some(1));
        assert_eq!(cmd.param("b").unwrap().ordinal(), Some(2));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let cmd = Command::builder("go", "")
            .param(param("Count", None))
            .action(noop())
            .build()
            .unwrap();
        assert!(cmd.param("count").is_some());
        assert!(cmd.param("COUNT").is_some());
        assert!(cmd.param("other").is_none());
    }
}

//! Token-to-parameter resolution.
//!
//! The resolver turns a tokenized command line into a
//! [`ResolvedInvocation`]: it finds the command, matches each token to a
//! declared parameter (boolean shorthand, explicit name/value pair, or
//! implicit position), converts raw values through the converter, and
//! reconciles the result against the command's parameter contract.
//!
//! Implicit positional matching walks the ordinal-ranked parameter list
//! with a monotonic cursor: each implicit token takes the lowest
//! not-yet-bound rank at or after the cursor, and the cursor never moves
//! backward. Explicit and shorthand bindings take a slot out of the
//! implicit scan but are never overwritten by it.

use tracing::debug;

use thiserror::Error;

use crate::command::Command;
use crate::convert::Converter;
use crate::invoke::{ResolvedInvocation, ResolvedValues};
use crate::param::ParameterValue;
use crate::registry::CommandRegistry;
use crate::token::{tokenize, CommandLine, SyntaxError};

/// Errors from resolving a command line.
///
/// Each variant names the offending command, parameter, or token; a failed
/// resolution never partially executes anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The line itself was malformed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The command name is not registered.
    #[error("unknown command: '{name}'")]
    CommandNotFound { name: String },

    /// A token named a parameter the command does not declare, or no
    /// implicit slot was left for a positional value.
    #[error("command '{command}' has no parameter matching '{token}'")]
    ParameterNotFound { command: String, token: String },

    /// A raw value could not be converted to the parameter's type.
    #[error("'{token}' is not a valid {expected} for parameter '{parameter}' of command '{command}'")]
    TypeMismatch {
        command: String,
        parameter: String,
        token: String,
        expected: String,
    },

    /// The same parameter received more than one value, in any mix of
    /// explicit, implicit, and shorthand forms.
    #[error("parameter '{parameter}' of command '{command}' was given more than once")]
    DuplicateParameter { command: String, parameter: String },

    /// A parameter without a default received no value.
    #[error("required parameter '{parameter}' of command '{command}' was not given")]
    MissingParameter { command: String, parameter: String },
}

/// Resolves tokenized lines against a registry and a converter.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a CommandRegistry,
    converter: &'a Converter,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a CommandRegistry, converter: &'a Converter) -> Self {
        Self {
            registry,
            converter,
        }
    }

    /// Tokenize and resolve a raw line.
    pub fn resolve_line(&self, line: &str) -> Result<ResolvedInvocation, ResolveError> {
        let tokenized = tokenize(line)?;
        self.resolve(&tokenized)
    }

    /// Resolve an already tokenized line.
    pub fn resolve(&self, line: &CommandLine) -> Result<ResolvedInvocation, ResolveError> {
        let command = self
            .registry
            .find(&line.name)
            .ok_or_else(|| ResolveError::CommandNotFound {
                name: line.name.clone(),
            })?;

        debug!(command = %command.name(), tokens = line.args.len(), "resolving");

        // All bindings a parameter received, by parameter position.
        // Duplicates are detected after the scan, so every token is
        // diagnosed in its own right first.
        let mut bindings: Vec<Vec<ParameterValue>> =
            (0..command.params().len()).map(|_| Vec::new()).collect();

        let ordered = command.ordered_indices();
        let mut cursor = 0usize;

        let args = &line.args;
        let mut i = 0;
        while i < args.len() {
            let token = &args[i];

            if let Some(name) = token.strip_prefix("--not-") {
                let slot = self.named_slot(&command, name, token)?;
                bind_bool(&command, slot, false, token, &mut bindings)?;
                i += 1;
            } else if let Some(name) = token.strip_prefix("--") {
                let slot = self.named_slot(&command, name, token)?;
                bind_bool(&command, slot, true, token, &mut bindings)?;
                i += 1;
            } else if let Some(slot) = command.param_index(token) {
                // Explicit name: the next token is the raw value.
                let Some(raw) = args.get(i + 1) else {
                    return Err(ResolveError::MissingParameter {
                        command: command.name().to_string(),
                        parameter: command.param_at(slot).name().to_string(),
                    });
                };
                self.bind(&command, slot, raw, &mut bindings)?;
                i += 2;
            } else {
                // Implicit position: the next unfilled ordinal slot at or
                // after the cursor.
                while cursor < ordered.len() && !bindings[ordered[cursor]].is_empty() {
                    cursor += 1;
                }
                let Some(&slot) = ordered.get(cursor) else {
                    return Err(ResolveError::ParameterNotFound {
                        command: command.name().to_string(),
                        token: token.clone(),
                    });
                };
                self.bind(&command, slot, token, &mut bindings)?;
                i += 1;
            }
        }

        // Contract pass: exactly one binding per parameter, defaults for
        // the untouched, errors for the rest.
        let mut resolved = Vec::with_capacity(bindings.len());
        for (index, slot_bindings) in bindings.into_iter().enumerate() {
            let param = command.param_at(index);
            let mut taken = slot_bindings.into_iter();
            match (taken.next(), taken.next()) {
                (Some(binding), None) => resolved.push(binding),
                (Some(_), Some(_)) => {
                    return Err(ResolveError::DuplicateParameter {
                        command: command.name().to_string(),
                        parameter: param.name().to_string(),
                    });
                }
                (None, _) => match param.default_binding() {
                    Some(binding) => resolved.push(binding),
                    None => {
                        return Err(ResolveError::MissingParameter {
                            command: command.name().to_string(),
                            parameter: param.name().to_string(),
                        });
                    }
                },
            }
        }

        Ok(ResolvedInvocation::new(command, ResolvedValues::new(resolved)))
    }

    /// Look up a shorthand-named parameter, case-insensitively.
    fn named_slot(
        &self,
        command: &Command,
        name: &str,
        token: &str,
    ) -> Result<usize, ResolveError> {
        command
            .param_index(name)
            .ok_or_else(|| ResolveError::ParameterNotFound {
                command: command.name().to_string(),
                token: token.to_string(),
            })
    }

    /// Convert `raw` against the slot's type and record the binding.
    fn bind(
        &self,
        command: &Command,
        slot: usize,
        raw: &str,
        bindings: &mut [Vec<ParameterValue>],
    ) -> Result<(), ResolveError> {
        let param = command.param_at(slot);
        let mismatch = || ResolveError::TypeMismatch {
            command: command.name().to_string(),
            parameter: param.name().to_string(),
            token: raw.to_string(),
            expected: param.ty().display_name(),
        };

        let value = self
            .converter
            .convert(raw, param.ty())
            .ok_or_else(|| mismatch())?;
        // A misbehaving custom hook can hand back a value of the wrong
        // type; that is still a conversion failure from the caller's view.
        let binding = param.value_of(value).map_err(|_| mismatch())?;
        bindings[slot].push(binding);
        Ok(())
    }
}

/// Bind a shorthand boolean. The shorthand form carries a boolean value,
/// not a raw token, so a non-boolean parameter rejects it here.
fn bind_bool(
    command: &Command,
    slot: usize,
    flag: bool,
    token: &str,
    bindings: &mut [Vec<ParameterValue>],
) -> Result<(), ResolveError> {
    let param = command.param_at(slot);
    let binding =
        param
            .value_of(crate::types::Value::Bool(flag))
            .map_err(|_| ResolveError::TypeMismatch {
                command: command.name().to_string(),
                parameter: param.name().to_string(),
                token: token.to_string(),
                expected: param.ty().display_name(),
            })?;
    bindings[slot].push(binding);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Parameter;
    use crate::types::{Primitive, TypeDesc, Value};
    use assert_matches::assert_matches;

    /// `greet name:String (rank 1, required) times:int (rank 2, default 1)
    /// loud:boolean (default false)`
    fn greet() -> Command {
        Command::builder("greet", "Greet someone.")
            .param(
                Parameter::new("name", TypeDesc::string(), "Who to greet.")
                    .unwrap()
                    .with_ordinal(1)
                    .unwrap(),
            )
            .param(
                Parameter::new("times", TypeDesc::Primitive(Primitive::Int), "Repeat count.")
                    .unwrap()
                    .with_ordinal(2)
                    .unwrap()
                    .with_default(Value::Int(1))
                    .unwrap(),
            )
            .param(
                Parameter::new("loud", TypeDesc::Primitive(Primitive::Bool), "Shout.")
                    .unwrap()
                    .with_default(Value::Bool(false))
                    .unwrap(),
            )
            .action(|_, _, _| true)
            .build()
            .unwrap()
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(greet());
        registry
    }

    fn resolve(line: &str) -> Result<ResolvedInvocation, ResolveError> {
        let registry = registry();
        let converter = Converter::new();
        let invocation = Resolver::new(&registry, &converter).resolve_line(line);
        invocation
    }

    #[test]
    fn test_implicit_positional() {
        let inv = resolve("greet Ada 3").unwrap();
        assert_eq!(inv.values().text("name"), Some("Ada"));
        assert_eq!(inv.values().int("times"), Some(3));
        assert_eq!(inv.values().bool("loud"), Some(false));
    }

    #[test]
    fn test_explicit_named() {
        let inv = resolve("greet times 5 name Ada").unwrap();
        assert_eq!(inv.values().text("name"), Some("Ada"));
        assert_eq!(inv.values().int("times"), Some(5));
    }

    #[test]
    fn test_explicit_name_case_insensitive() {
        let inv = resolve("greet NAME Ada").unwrap();
        assert_eq!(inv.values().text("name"), Some("Ada"));
    }

    #[test]
    fn test_defaults_fill_unbound() {
        let inv = resolve("greet Ada").unwrap();
        assert_eq!(inv.values().int("times"), Some(1));
        assert_eq!(inv.values().bool("loud"), Some(false));
    }

    #[test]
    fn test_explicit_takes_slot_out_of_implicit_scan() {
        // `name` is bound explicitly, so the implicit value lands on the
        // next unfilled rank: `times`.
        let inv = resolve("greet name Ada 7").unwrap();
        assert_eq!(inv.values().text("name"), Some("Ada"));
        assert_eq!(inv.values().int("times"), Some(7));
    }

    #[test]
    fn test_boolean_shorthand() {
        let inv = resolve("greet Ada --loud").unwrap();
        assert_eq!(inv.values().bool("loud"), Some(true));

        let inv = resolve("greet Ada --not-loud").unwrap();
        assert_eq!(inv.values().bool("loud"), Some(false));
    }

    #[test]
    fn test_shorthand_equivalent_to_explicit() {
        let a = resolve("greet Ada --loud").unwrap();
        let b = resolve("greet Ada loud true").unwrap();
        assert_eq!(a.values().bool("loud"), b.values().bool("loud"));
    }

    #[test]
    fn test_shorthand_unknown_name() {
        assert_matches!(
            resolve("greet Ada --verbose"),
            Err(ResolveError::ParameterNotFound { token, .. }) if token == "--verbose"
        );
        assert_matches!(
            resolve("greet Ada --not-verbose"),
            Err(ResolveError::ParameterNotFound { .. })
        );
    }

    #[test]
    fn test_shorthand_on_non_boolean_is_type_mismatch() {
        assert_matches!(
            resolve("greet --name"),
            Err(ResolveError::TypeMismatch { parameter, .. }) if parameter == "name"
        );
    }

    #[test]
    fn test_command_not_found() {
        assert_matches!(
            resolve("frobnicate x"),
            Err(ResolveError::CommandNotFound { name }) if name == "frobnicate"
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert_matches!(
            resolve("greet name Ada times notanumber"),
            Err(ResolveError::TypeMismatch { parameter, token, .. })
                if parameter == "times" && token == "notanumber"
        );
    }

    #[test]
    fn test_missing_required() {
        assert_matches!(
            resolve("greet"),
            Err(ResolveError::MissingParameter { parameter, .. }) if parameter == "name"
        );
    }

    #[test]
    fn test_explicit_name_without_value() {
        assert_matches!(
            resolve("greet name"),
            Err(ResolveError::MissingParameter { parameter, .. }) if parameter == "name"
        );
    }

    #[test]
    fn test_duplicate_explicit() {
        assert_matches!(
            resolve("greet name Ada name Grace"),
            Err(ResolveError::DuplicateParameter { parameter, .. }) if parameter == "name"
        );
    }

    #[test]
    fn test_duplicate_mixed_explicit_and_implicit() {
        // First token binds rank 1 implicitly; the explicit pair binds the
        // same parameter again.
        assert_matches!(
            resolve("greet Ada name Grace"),
            Err(ResolveError::DuplicateParameter { parameter, .. }) if parameter == "name"
        );
    }

    #[test]
    fn test_duplicate_mixed_shorthand_and_explicit() {
        assert_matches!(
            resolve("greet Ada --loud loud false"),
            Err(ResolveError::DuplicateParameter { parameter, .. }) if parameter == "loud"
        );
    }

    #[test]
    fn test_no_implicit_slot_left() {
        assert_matches!(
            resolve("greet Ada 3 extra"),
            Err(ResolveError::ParameterNotFound { token, .. }) if token == "extra"
        );
    }

    #[test]
    fn test_ordinal_monotonicity() {
        // Two implicit tokens always fill the two lowest ranks.
        let inv = resolve("greet Grace 4").unwrap();
        assert_eq!(inv.values().text("name"), Some("Grace"));
        assert_eq!(inv.values().int("times"), Some(4));
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let first = resolve("greet Ada").unwrap();
        let second = resolve("greet Ada").unwrap();
        assert_eq!(
            first.values().get("times").unwrap(),
            second.values().get("times").unwrap()
        );
        assert_eq!(
            first.values().get("loud").unwrap(),
            second.values().get("loud").unwrap()
        );
    }

    #[test]
    fn test_syntax_error_carried_through() {
        assert_matches!(resolve("greet \"unterminated"), Err(ResolveError::Syntax(_)));
        assert_matches!(resolve("   "), Err(ResolveError::Syntax(SyntaxError::EmptyLine)));
    }

    #[test]
    fn test_quoted_value_token() {
        let inv = resolve("greet \"Ada Lovelace\" 3").unwrap();
        assert_eq!(inv.values().text("name"), Some("Ada Lovelace"));
    }
}

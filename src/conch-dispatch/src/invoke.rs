//! Resolved invocations.
//!
//! A [`ResolvedInvocation`] pairs a command with a complete value map: by
//! construction it holds exactly one value per declared parameter.
//! Executing it dispatches to the command's action; executing it again
//! simply re-runs the action on the same bound values, without re-parsing.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::command::{Command, OutputSink};
use crate::param::ParameterValue;
use crate::registry::CommandRegistry;
use crate::types::Value;

/// Error from looking up an undeclared parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no parameter named '{name}'")]
pub struct UnknownParameter {
    /// The name that was asked for.
    pub name: String,
}

/// Read-only lookup over the resolved parameter values.
#[derive(Debug, Clone)]
pub struct ResolvedValues {
    /// Lowercased parameter name to its binding.
    values: HashMap<String, ParameterValue>,
}

impl ResolvedValues {
    pub(crate) fn new(bindings: Vec<ParameterValue>) -> Self {
        let values = bindings
            .into_iter()
            .map(|b| (b.parameter().to_lowercase(), b))
            .collect();
        Self { values }
    }

    /// The value bound to `name` (case-insensitive).
    ///
    /// Fails only for names that were never declared parameters, which
    /// cannot happen for names taken from the owning command.
    pub fn get(&self, name: &str) -> Result<&Value, UnknownParameter> {
        self.values
            .get(&name.to_lowercase())
            .map(ParameterValue::value)
            .ok_or_else(|| UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Typed convenience accessor: boolean.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).ok().and_then(Value::as_bool)
    }

    /// Typed convenience accessor: int.
    pub fn int(&self, name: &str) -> Option<i32> {
        self.get(name).ok().and_then(Value::as_int)
    }

    /// Typed convenience accessor: long.
    pub fn long(&self, name: &str) -> Option<i64> {
        self.get(name).ok().and_then(Value::as_long)
    }

    /// Typed convenience accessor: object text (string, path, custom).
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).ok().and_then(Value::as_text)
    }

    /// Typed convenience accessor: enum literal name.
    pub fn literal(&self, name: &str) -> Option<&str> {
        self.get(name).ok().and_then(Value::as_literal)
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterValue> {
        self.values.values()
    }
}

/// Outcome of executing an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the command's action reported success.
    pub success: bool,
}

/// A command plus its complete, validated value map, ready to execute.
#[derive(Debug)]
pub struct ResolvedInvocation {
    command: Arc<Command>,
    values: ResolvedValues,
}

impl ResolvedInvocation {
    pub(crate) fn new(command: Arc<Command>, values: ResolvedValues) -> Self {
        Self { command, values }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn values(&self) -> &ResolvedValues {
        &self.values
    }

    /// Run the command's action with the bound values.
    ///
    /// May be called more than once; the values are not re-parsed.
    pub fn execute(
        &self,
        registry: &CommandRegistry,
        sink: &mut dyn OutputSink,
    ) -> ExecutionResult {
        let success = self.command.run_action(registry, &self.values, sink);
        ExecutionResult { success }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Parameter;
    use crate::types::{Primitive, TypeDesc};

    fn values() -> ResolvedValues {
        let name = Parameter::new("name", TypeDesc::string(), "").unwrap();
        let times = Parameter::new("times", TypeDesc::Primitive(Primitive::Int), "").unwrap();
        ResolvedValues::new(vec![
            name.value_of(Value::string("Ada")).unwrap(),
            times.value_of(Value::Int(3)).unwrap(),
        ])
    }

    #[test]
    fn test_lookup() {
        let values = values();
        assert_eq!(values.get("name").unwrap(), &Value::string("Ada"));
        assert_eq!(values.get("TIMES").unwrap(), &Value::Int(3));
        assert_eq!(
            values.get("missing"),
            Err(UnknownParameter {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_typed_accessors() {
        let values = values();
        assert_eq!(values.text("name"), Some("Ada"));
        assert_eq!(values.int("times"), Some(3));
        assert_eq!(values.bool("times"), None);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_execute_and_reexecute() {
        let cmd = Command::builder("count", "")
            .action(|_, values, sink| {
                sink.write_line(&format!("n = {}", values.int("times").unwrap_or(0)));
                true
            })
            .build()
            .unwrap();

        let invocation = ResolvedInvocation::new(Arc::new(cmd), values());
        let registry = CommandRegistry::new();

        let mut sink: Vec<String> = Vec::new();
        assert!(invocation.execute(&registry, &mut sink).success);
        assert!(invocation.execute(&registry, &mut sink).success);
        assert_eq!(sink, vec!["n = 3", "n = 3"]);
    }
}

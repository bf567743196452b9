//! Machine-readable command documentation.
//!
//! Plain serializable carriers describing registered commands, for hosts
//! that export their command inventory (completion tooling, docs
//! generation) rather than printing the human help blocks.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::param::Parameter;
use crate::registry::CommandRegistry;
use crate::types::TypeDesc;

/// Documentation for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDocs {
    pub name: String,
    /// Fully qualified type name.
    pub type_name: String,
    /// Short type name.
    pub type_display: String,
    /// Normalized rank, if the parameter is positional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// Rendered default value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Legal literal names for enum-typed parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<String>,
    pub description: String,
}

impl From<&Parameter> for ParameterDocs {
    fn from(param: &Parameter) -> Self {
        let literals = match param.ty() {
            TypeDesc::Enum(e) => e.literals().to_vec(),
            _ => Vec::new(),
        };
        Self {
            name: param.name().to_string(),
            type_name: param.ty().name(),
            type_display: param.ty().display_name(),
            rank: param.ordinal(),
            default: param.default().map(|d| d.to_string()),
            literals,
            description: param.description().to_string(),
        }
    }
}

/// Documentation for one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDocs {
    pub name: String,
    pub description: String,
    /// Parameters in documentation order: ranked first, then unranked.
    pub parameters: Vec<ParameterDocs>,
}

impl From<&Command> for CommandDocs {
    fn from(command: &Command) -> Self {
        let unranked = command.params().iter().filter(|p| p.ordinal().is_none());
        let parameters = command
            .ordered_params()
            .chain(unranked)
            .map(ParameterDocs::from)
            .collect();
        Self {
            name: command.name().to_string(),
            description: command.description().to_string(),
            parameters,
        }
    }
}

/// Describe every registered command, sorted by name.
pub fn describe_registry(registry: &CommandRegistry) -> Vec<CommandDocs> {
    registry
        .list()
        .iter()
        .map(|c| CommandDocs::from(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, Value};

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
                    .with_default(Value::Int(1))
                    .unwrap(),
            )
            .action(|_, _, _| true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_describe_command() {
        let docs = CommandDocs::from(&greet());
        assert_eq!(docs.name, "greet");
        assert_eq!(docs.parameters.len(), 2);
        assert_eq!(docs.parameters[0].name, "name");
        assert_eq!(docs.parameters[0].rank, Some(1));
        assert_eq!(docs.parameters[1].rank, None);
        assert_eq!(docs.parameters[1].default.as_deref(), Some("1"));
    }

    #[test]
    fn test_serializes_to_json() {
        let docs = CommandDocs::from(&greet());
        let json = serde_json::to_string(&docs).unwrap();
        assert!(json.contains("\"name\":\"greet\""));

        let back: CommandDocs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, docs);
    }

    #[test]
    fn test_describe_registry_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(greet());
        registry.register(
            Command::builder("abort", "Stop.")
                .action(|_, _, _| true)
                .build()
                .unwrap(),
        );

        let docs = describe_registry(&registry);
        assert_eq!(docs[0].name, "abort");
        assert_eq!(docs[1].name, "greet");
    }
}

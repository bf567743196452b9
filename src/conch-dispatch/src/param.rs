//! Parameter model: one named, typed input slot of a command.
//!
//! Parameters are built once at command-definition time and immutable
//! afterwards. A parameter may carry a default value (validated against
//! its type when set) and a declared ordinal; ordinals are normalized to
//! dense ranks when the owning command is built.

use thiserror::Error;

use crate::token::is_valid_name;
use crate::types::{TypeDesc, Value};

/// Errors from parameter construction and value binding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The name violates `[_a-zA-Z][_a-zA-Z0-9]*`.
    #[error("invalid parameter name: '{name}'")]
    InvalidName { name: String },

    /// A declared ordinal must be positive.
    #[error("parameter '{parameter}' declares ordinal 0; ordinals start at 1")]
    ZeroOrdinal { parameter: String },

    /// The default value does not fit the declared type.
    #[error("default value for parameter '{parameter}' is not a valid {expected}")]
    InvalidDefault { parameter: String, expected: String },

    /// A bound value does not fit the declared type.
    #[error("value for parameter '{parameter}' is not a valid {expected}")]
    ValueTypeMismatch { parameter: String, expected: String },
}

/// A named, typed, optionally-ordinal, optionally-defaulted input slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    ty: TypeDesc,
    description: String,
    default: Option<Value>,
    ordinal: Option<u32>,
}

impl Parameter {
    /// Create a parameter with no default and no ordinal.
    pub fn new(
        name: impl Into<String>,
        ty: TypeDesc,
        description: impl Into<String>,
    ) -> Result<Self, ParamError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(ParamError::InvalidName { name });
        }
        Ok(Self {
            name,
            ty,
            description: description.into(),
            default: None,
            ordinal: None,
        })
    }

    /// Attach a default value, validated against the declared type.
    pub fn with_default(mut self, default: Value) -> Result<Self, ParamError> {
        if !self.ty.is_valid_value(&default) {
            return Err(ParamError::InvalidDefault {
                parameter: self.name,
                expected: self.ty.display_name(),
            });
        }
        self.default = Some(default);
        Ok(self)
    }

    /// Attach a declared ordinal (positive).
    pub fn with_ordinal(mut self, ordinal: u32) -> Result<Self, ParamError> {
        if ordinal == 0 {
            return Err(ParamError::ZeroOrdinal {
                parameter: self.name,
            });
        }
        self.ordinal = Some(ordinal);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The ordinal: the declared one before command construction, the
    /// normalized dense rank after.
    pub fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }

    /// Whether resolution may leave this parameter unbound.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Bind a value, enforcing the declared type.
    ///
    /// This is the only way a [`ParameterValue`] is produced.
    pub fn value_of(&self, value: Value) -> Result<ParameterValue, ParamError> {
        if !self.ty.is_valid_value(&value) {
            return Err(ParamError::ValueTypeMismatch {
                parameter: self.name.clone(),
                expected: self.ty.display_name(),
            });
        }
        Ok(ParameterValue {
            parameter: self.name.clone(),
            value,
        })
    }

    /// A binding of the default value, if one was declared.
    ///
    /// Infallible: the default was validated when it was attached.
    pub fn default_binding(&self) -> Option<ParameterValue> {
        self.default.as_ref().map(|default| ParameterValue {
            parameter: self.name.clone(),
            value: default.clone(),
        })
    }

    /// Rewrite the ordinal to its normalized rank. Command-build only.
    pub(crate) fn set_rank(&mut self, rank: u32) {
        self.ordinal = Some(rank);
    }
}

/// A value bound to a named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValue {
    parameter: String,
    value: Value,
}

impl ParameterValue {
    /// Name of the parameter this value is bound to.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

//! Type descriptors and runtime values.
//!
//! The value kinds a parameter can declare form a closed tagged union:
//! primitives, named object types, enumerations, and arrays. Object types
//! carry an explicit optional parent link, so nominal subtyping is checked
//! by walking the chain rather than by language inheritance.
//!
//! Custom object types are ordinary [`ObjectType`] values; teaching the
//! converter how to parse them is done through its hook chain (see
//! [`crate::convert::Converter`]).

use std::fmt;
use std::sync::Arc;

use crate::array::ArrayValue;

/// Fully qualified name of the well-known string object type.
pub const STRING_TYPE_NAME: &str = "conch.text.String";

/// Fully qualified name of the well-known file-path object type.
pub const PATH_TYPE_NAME: &str = "conch.files.Path";

/// The primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    /// Short display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// A named opaque object type with an explicit optional parent.
#[derive(Debug, Clone)]
pub struct ObjectType {
    name: Arc<str>,
    parent: Option<Arc<ObjectType>>,
}

impl ObjectType {
    /// Create a root object type with a fully qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().into(),
            parent: None,
        }
    }

    /// Create an object type that subtypes `parent`.
    pub fn with_parent(name: impl Into<String>, parent: ObjectType) -> Self {
        Self {
            name: name.into().into(),
            parent: Some(Arc::new(parent)),
        }
    }

    /// The well-known string type.
    pub fn string() -> Self {
        Self::new(STRING_TYPE_NAME)
    }

    /// The well-known file-path type.
    pub fn path() -> Self {
        Self::new(PATH_TYPE_NAME)
    }

    /// Fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short name (the last dot-separated segment).
    pub fn display_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Whether `self` names `other` or reaches it through parent links.
    pub fn is_subtype_of(&self, other: &ObjectType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.name == other.name {
                return true;
            }
            current = ty.parent.as_deref();
        }
        false
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ObjectType {}

/// A named enumeration with an ordered set of literal names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: Arc<str>,
    literals: Vec<String>,
}

impl EnumType {
    /// Create an enum type from its qualified name and ordered literals.
    pub fn new<I, S>(name: impl Into<String>, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into().into(),
            literals: literals.into_iter().map(Into::into).collect(),
        }
    }

    /// Fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short name (the last dot-separated segment).
    pub fn display_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// The ordered list of legal literal names.
    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Whether `literal` is one of the legal names (case-sensitive).
    pub fn has_literal(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l == literal)
    }
}

/// Descriptor identifying a value kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// A primitive kind.
    Primitive(Primitive),
    /// A named opaque object type; admits null values.
    Object(ObjectType),
    /// A named enumeration.
    Enum(EnumType),
    /// An array of `elem` with `dims >= 1` dimensions; admits null values.
    Array { elem: Box<TypeDesc>, dims: usize },
}

impl TypeDesc {
    /// The well-known string type descriptor.
    pub fn string() -> Self {
        Self::Object(ObjectType::string())
    }

    /// The well-known file-path type descriptor.
    pub fn path() -> Self {
        Self::Object(ObjectType::path())
    }

    /// An array descriptor. `dims` must be at least 1.
    pub fn array(elem: TypeDesc, dims: usize) -> Self {
        assert!(dims >= 1, "array descriptor requires dims >= 1");
        Self::Array {
            elem: Box::new(elem),
            dims,
        }
    }

    /// Fully qualified name.
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(p) => format!("conch.primitive.{}", p.display_name()),
            Self::Object(o) => o.name().to_string(),
            Self::Enum(e) => e.name().to_string(),
            Self::Array { elem, dims } => format!("{}{}", elem.name(), "[]".repeat(*dims)),
        }
    }

    /// Short name for display in documentation.
    pub fn display_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.display_name().to_string(),
            Self::Object(o) => o.display_name().to_string(),
            Self::Enum(e) => e.display_name().to_string(),
            Self::Array { elem, dims } => {
                format!("{}{}", elem.display_name(), "[]".repeat(*dims))
            }
        }
    }

    /// Whether this descriptor is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Whether this descriptor is an enumeration.
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Whether `value` is a legal value for this descriptor.
    pub fn is_valid_value(&self, value: &Value) -> bool {
        match self {
            Self::Primitive(p) => {
                matches!(
                    (p, value),
                    (Primitive::Bool, Value::Bool(_))
                        | (Primitive::Byte, Value::Byte(_))
                        | (Primitive::Short, Value::Short(_))
                        | (Primitive::Char, Value::Char(_))
                        | (Primitive::Int, Value::Int(_))
                        | (Primitive::Long, Value::Long(_))
                        | (Primitive::Float, Value::Float(_))
                        | (Primitive::Double, Value::Double(_))
                )
            }
            Self::Object(o) => match value {
                Value::Null => true,
                Value::Object { ty, .. } => ty.is_subtype_of(o),
                _ => false,
            },
            Self::Enum(e) => match value {
                Value::Enum { ty, literal } => ty == e && e.has_literal(literal),
                _ => false,
            },
            Self::Array { elem, dims } => match value {
                Value::Null => true,
                Value::Array(array) => {
                    array.dims() == *dims && array.elem().is_subtype_of(elem)
                }
                _ => false,
            },
        }
    }

    /// Subtype query.
    ///
    /// Primitives and enums are subtypes only of themselves; object types
    /// follow their parent chain; arrays require an exact dimension match
    /// and allow element covariance.
    pub fn is_subtype_of(&self, other: &TypeDesc) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.is_subtype_of(b),
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (
                Self::Array { elem: a, dims: n },
                Self::Array { elem: b, dims: m },
            ) => n == m && a.is_subtype_of(b),
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A dynamically typed runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value, admitted by object and array descriptors.
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// An instance of a named object type; the payload is its text form.
    Object { ty: ObjectType, repr: String },
    /// An enumeration value.
    Enum { ty: EnumType, literal: String },
    /// A structured array value.
    Array(ArrayValue),
}

impl Value {
    /// A string-typed object value.
    pub fn string(text: impl Into<String>) -> Self {
        Self::Object {
            ty: ObjectType::string(),
            repr: text.into(),
        }
    }

    /// A path-typed object value.
    pub fn path(text: impl Into<String>) -> Self {
        Self::Object {
            ty: ObjectType::path(),
            repr: text.into(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// The text of an object value (string, path, or custom).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Object { repr, .. } => Some(repr),
            _ => None,
        }
    }

    /// The literal name of an enum value.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Enum { literal, .. } => Some(literal),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Byte(b) => write!(f, "{b}"),
            Self::Short(s) => write!(f, "{s}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Double(x) => write!(f, "{x}"),
            Self::Object { repr, .. } => f.write_str(repr),
            Self::Enum { literal, .. } => f.write_str(literal),
            Self::Array(a) => write!(f, "{a}"),
        }
    }
}

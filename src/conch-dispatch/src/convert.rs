//! Raw token to typed value conversion.
//!
//! Conversion never fails loudly: "could not parse" is `None`, leaving the
//! resolver to say which parameter of which command rejected which token.
//!
//! The converter is open. User hooks registered with
//! [`Converter::with_hook`] run before the built-in dispatch and may either
//! produce a value or decline (return `None`), in which case the base
//! behavior applies. This is how custom object types become parseable.

use crate::array::ArrayValue;
use crate::types::{ObjectType, Primitive, TypeDesc, Value, PATH_TYPE_NAME, STRING_TYPE_NAME};

/// A user conversion hook. Returns `None` to decline.
pub type ConvertHook = Box<dyn Fn(&str, &TypeDesc) -> Option<Value> + Send + Sync>;

/// Characters never allowed in a path token.
const RESERVED_PATH_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Converts raw tokens into typed values.
#[derive(Default)]
pub struct Converter {
    hooks: Vec<ConvertHook>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Converter {
    /// A converter with only the built-in behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom conversion hook, tried before the built-in dispatch.
    ///
    /// Hooks run in registration order; the first one producing a value
    /// wins.
    pub fn with_hook(mut self, hook: ConvertHook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Convert `raw` against `ty`, or `None` if it cannot be parsed.
    pub fn convert(&self, raw: &str, ty: &TypeDesc) -> Option<Value> {
        for hook in &self.hooks {
            if let Some(value) = hook(raw, ty) {
                return Some(value);
            }
        }
        self.convert_builtin(raw, ty)
    }

    fn convert_builtin(&self, raw: &str, ty: &TypeDesc) -> Option<Value> {
        match ty {
            TypeDesc::Primitive(p) => convert_primitive(raw, *p),
            TypeDesc::Object(o) => convert_object(raw, o),
            TypeDesc::Enum(e) => {
                if e.has_literal(raw) {
                    Some(Value::Enum {
                        ty: e.clone(),
                        literal: raw.to_string(),
                    })
                } else {
                    None
                }
            }
            TypeDesc::Array { elem, dims } => self.convert_array(raw, elem, *dims),
        }
    }

    /// Recursive-descent parse of a brace literal.
    fn convert_array(&self, raw: &str, elem: &TypeDesc, dims: usize) -> Option<Value> {
        let tokens = lex_array_literal(raw)?;
        let mut pos = 0;
        let array = self.parse_array_group(&tokens, &mut pos, elem, dims)?;
        // The whole token stream must belong to the literal.
        if pos != tokens.len() {
            return None;
        }
        Some(Value::Array(array))
    }

    fn parse_array_group(
        &self,
        tokens: &[ArrayToken],
        pos: &mut usize,
        elem: &TypeDesc,
        dims: usize,
    ) -> Option<ArrayValue> {
        match tokens.get(*pos) {
            Some(ArrayToken::Open) => *pos += 1,
            _ => return None,
        }

        let mut items = Vec::new();
        loop {
            match tokens.get(*pos) {
                Some(ArrayToken::Close) => {
                    *pos += 1;
                    break;
                }
                Some(ArrayToken::Open) => {
                    // A nested group is only legal below the declared depth.
                    if dims < 2 {
                        return None;
                    }
                    let sub = self.parse_array_group(tokens, pos, elem, dims - 1)?;
                    items.push(Value::Array(sub));
                }
                Some(ArrayToken::Element(text)) => {
                    if dims != 1 {
                        return None;
                    }
                    items.push(self.convert(text, elem)?);
                    *pos += 1;
                }
                None => return None,
            }
        }

        ArrayValue::new(elem.clone(), dims, items).ok()
    }
}

fn convert_primitive(raw: &str, p: Primitive) -> Option<Value> {
    match p {
        Primitive::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        Primitive::Byte => raw.parse::<i8>().ok().map(Value::Byte),
        Primitive::Short => raw.parse::<i16>().ok().map(Value::Short),
        Primitive::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        Primitive::Int => raw.parse::<i32>().ok().map(Value::Int),
        Primitive::Long => raw.parse::<i64>().ok().map(Value::Long),
        Primitive::Float => raw.parse::<f32>().ok().map(Value::Float),
        Primitive::Double => raw.parse::<f64>().ok().map(Value::Double),
    }
}

fn convert_object(raw: &str, ty: &ObjectType) -> Option<Value> {
    match ty.name() {
        STRING_TYPE_NAME => Some(Value::Object {
            ty: ty.clone(),
            repr: raw.to_string(),
        }),
        PATH_TYPE_NAME => {
            if is_valid_path(raw) {
                Some(Value::Object {
                    ty: ty.clone(),
                    repr: raw.to_string(),
                })
            } else {
                None
            }
        }
        // Custom object types are the hook chain's business.
        _ => None,
    }
}

/// A path may not contain reserved filesystem characters; a drive-letter
/// prefix `X:` is permitted only as the literal first two characters.
fn is_valid_path(raw: &str) -> bool {
    let has_drive_prefix = {
        let mut chars = raw.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
        )
    };

    raw.char_indices().all(|(i, c)| {
        if c == ':' && i == 1 && has_drive_prefix {
            return true;
        }
        !RESERVED_PATH_CHARS.contains(&c)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ArrayToken {
    Open,
    Close,
    Element(String),
}

/// Lex a brace literal into `{`, `}` and element tokens.
///
/// Elements are separated by commas or whitespace; both are pure
/// separators and produce no token.
fn lex_array_literal(raw: &str) -> Option<Vec<ArrayToken>> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in raw.chars() {
        match c {
            '{' | '}' => {
                if !current.is_empty() {
                    tokens.push(ArrayToken::Element(std::mem::take(&mut current)));
                }
                tokens.push(if c == '{' {
                    ArrayToken::Open
                } else {
                    ArrayToken::Close
                });
            }
            ',' => {
                if !current.is_empty() {
                    tokens.push(ArrayToken::Element(std::mem::take(&mut current)));
                }
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(ArrayToken::Element(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(ArrayToken::Element(current));
    }

    match tokens.first() {
        Some(ArrayToken::Open) => Some(tokens),
        _ => None,
    }
}

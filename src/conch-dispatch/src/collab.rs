//! Collaborator interfaces.
//!
//! The dispatch core stays free of I/O; commands that touch the file
//! system or cryptography do so through these seams. The traits are
//! defined here so command actions can be written against them; the
//! implementations live elsewhere (`conch-files` provides the lister and
//! the name-template renderer) or are supplied by the host.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::EnumType;

/// How a directory listing applies its filter pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// No filtering; the pattern is ignored.
    None,
    /// Entries matching the pattern are excluded.
    Filter,
    /// Only entries matching the pattern are included.
    AllowOnly,
}

impl FilterMode {
    /// The enum type descriptor for declaring filter-mode parameters.
    pub fn enum_type() -> EnumType {
        EnumType::new("conch.files.FilterMode", ["None", "Filter", "AllowOnly"])
    }

    /// Parse a literal name produced by the converter.
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "None" => Some(Self::None),
            "Filter" => Some(Self::Filter),
            "AllowOnly" => Some(Self::AllowOnly),
            _ => None,
        }
    }
}

/// Synchronous directory walking.
pub trait FileLister {
    /// List paths under `root`.
    ///
    /// `recurse` walks into subdirectories; `filter_mode` and
    /// `filter_spec` select entries by file name; `include_dirs` includes
    /// directory entries themselves in the result.
    fn list(
        &self,
        root: &Path,
        recurse: bool,
        filter_mode: FilterMode,
        filter_spec: &str,
        include_dirs: bool,
    ) -> io::Result<Vec<PathBuf>>;
}

/// A derived symmetric key.
#[derive(Clone, PartialEq, Eq)]
pub struct Key(Vec<u8>);

impl Key {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Key {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({} bytes)", self.0.len())
    }
}

/// Direction of a symmetric transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Errors from the encryption collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("cipher failed: {0}")]
    Cipher(String),
}

/// Symmetric encryption of byte buffers.
pub trait Encryptor {
    /// Derive a key from a password.
    fn derive_key(&self, password: &str) -> Result<Key, CryptoError>;

    /// Encrypt or decrypt a buffer with a derived key.
    fn transform(
        &self,
        data: &[u8],
        key: &Key,
        direction: Direction,
    ) -> Result<Vec<u8>, CryptoError>;
}

/// Field values available to a filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFields<'a> {
    /// The original file name without its extension.
    pub original_name: &'a str,
    /// Position of the file within the batch being generated.
    pub index: usize,
    /// The original extension, without the dot.
    pub extension: &'a str,
    /// The directory the original file lives in.
    pub original_location: &'a Path,
}

/// Errors from rendering a filename template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{...}` group was not closed.
    #[error("unterminated field in template")]
    UnterminatedField,

    /// A field name is not one of the defined fields.
    #[error("unknown template field: '{field}'")]
    UnknownField { field: String },

    /// A field parameter was malformed or not supported by the field.
    #[error("invalid parameter '{param}' for template field '{field}'")]
    BadParameter { field: String, param: String },
}

/// Filename generation from a wildcard template.
///
/// Template syntax: `{field}` or `{field:param}`, with `{{` and `}}` as
/// literal braces.
pub trait NameTemplate {
    fn render(&self, template: &str, fields: &NameFields<'_>) -> Result<String, TemplateError>;
}

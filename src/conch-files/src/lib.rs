//! File-system collaborators for Conch.
//!
//! Implements the file-facing seams declared in
//! [`conch_dispatch::collab`]: a synchronous directory lister and the
//! wildcard filename-template renderer. Command actions take these as
//! trait objects, so hosts can swap them for their own implementations.

mod lister;
mod template;

pub use lister::WalkLister;
pub use template::WildcardTemplate;

pub use conch_dispatch::collab::{
    FileLister, FilterMode, NameFields, NameTemplate, TemplateError,
};

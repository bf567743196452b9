//! The `list` default command.

use std::path::Path;

use conch_dispatch::collab::{FileLister, FilterMode};
use conch_dispatch::prelude::*;
use conch_files::WalkLister;

/// Build the `list` command over the directory-walk collaborator.
pub fn command() -> Result<Command, CommandError> {
    let path = Parameter::new("path", TypeDesc::path(), "Directory to list.")?
        .with_ordinal(1)?
        .with_default(Value::path("."))?;
    let recurse = Parameter::new(
        "recurse",
        TypeDesc::Primitive(Primitive::Bool),
        "Walk into subdirectories.",
    )?
    .with_default(Value::Bool(false))?;
    let mode_ty = FilterMode::enum_type();
    let mode = Parameter::new(
        "mode",
        TypeDesc::Enum(mode_ty.clone()),
        "How the filter pattern is applied.",
    )?
    .with_default(Value::Enum {
        ty: mode_ty,
        literal: "None".to_string(),
    })?;
    let filter = Parameter::new(
        "filter",
        TypeDesc::string(),
        "Glob pattern matched against file names.",
    )?
    .with_default(Value::string(""))?;
    let dirs = Parameter::new(
        "dirs",
        TypeDesc::Primitive(Primitive::Bool),
        "Include directory entries themselves.",
    )?
    .with_default(Value::Bool(false))?;

    Command::builder("list", "List files under a directory.")
        .param(path)
        .param(recurse)
        .param(mode)
        .param(filter)
        .param(dirs)
        .action(|_, values, sink| run(&WalkLister::new(), values, sink))
        .build()
}

fn run(lister: &dyn FileLister, values: &ResolvedValues, sink: &mut dyn OutputSink) -> bool {
    let root = values.text("path").unwrap_or(".");
    let recurse = values.bool("recurse").unwrap_or(false);
    let mode = values
        .literal("mode")
        .and_then(FilterMode::from_literal)
        .unwrap_or(FilterMode::None);
    let filter = values.text("filter").unwrap_or("");
    let dirs = values.bool("dirs").unwrap_or(false);

    match lister.list(Path::new(root), recurse, mode, filter, dirs) {
        Ok(paths) => {
            for path in paths {
                sink.write_line(&path.display().to_string());
            }
            true
        }
        Err(e) => {
            sink.write_line(&format!("list failed: {e}"));
            false
        }
    }
}

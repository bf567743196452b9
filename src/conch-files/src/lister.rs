//! Directory listing backed by a synchronous walk.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use conch_dispatch::collab::{FileLister, FilterMode};

/// [`FileLister`] implementation over `walkdir`.
///
/// Filtering matches the glob pattern against the entry's file name, not
/// the full path. Results are sorted for stable output.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkLister;

impl WalkLister {
    pub fn new() -> Self {
        Self
    }
}

impl FileLister for WalkLister {
    fn list(
        &self,
        root: &Path,
        recurse: bool,
        filter_mode: FilterMode,
        filter_spec: &str,
        include_dirs: bool,
    ) -> io::Result<Vec<PathBuf>> {
        let pattern = match filter_mode {
            FilterMode::None => None,
            FilterMode::Filter | FilterMode::AllowOnly => {
                Some(glob::Pattern::new(filter_spec).map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("bad filter pattern '{filter_spec}': {e}"),
                    )
                })?)
            }
        };

        let max_depth = if recurse { usize::MAX } else { 1 };
        let mut paths = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| {
                let kind = e
                    .io_error()
                    .map(io::Error::kind)
                    .unwrap_or(io::ErrorKind::Other);
                io::Error::new(kind, e)
            })?;

            if entry.file_type().is_dir() && !include_dirs {
                continue;
            }

            if let Some(pattern) = &pattern {
                let name = entry.file_name().to_string_lossy();
                let matched = pattern.matches(&name);
                let keep = match filter_mode {
                    FilterMode::Filter => !matched,
                    FilterMode::AllowOnly => matched,
                    FilterMode::None => true,
                };
                if !keep {
                    continue;
                }
            }

            paths.push(entry.into_path());
        }

        paths.sort();
        debug!(root = %root.display(), count = paths.len(), "listed directory");
        Ok(paths)
    }
}

//! Builds a proposed [`FileSet`] from a local project directory.
//!
//! Recursively walks the tree, normalizes relative paths to forward
//! slashes, and computes each file's streaming checksum. This is the
//! staging entry point for real directories.

use std::path::Path;

use chrono::{DateTime, Utc};

use fieldsync_protocol::{FileInfo, FileSet};
use fieldsync_transfer::{checksum_file, validate_relative_path};

use crate::error::PushError;

/// Scans `root` recursively and returns the file set describing its
/// current contents.
///
/// Relative paths use `/` as separator (even on Windows) to match the
/// server's expectations. Any unreadable file aborts the scan.
pub fn scan_project(root: &Path) -> Result<FileSet, PushError> {
    let mut files = FileSet::new();
    walk_dir(root, root, &mut files)?;
    Ok(files)
}

fn walk_dir(root: &Path, current: &Path, files: &mut FileSet) -> Result<(), PushError> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(root, &path, files)?;
        } else if metadata.is_file() {
            let rel_path = path.strip_prefix(root).map_err(std::io::Error::other)?;
            let rel_str = rel_path.to_string_lossy().replace('\\', "/");
            validate_relative_path(&rel_str)?;

            let checksum = checksum_file(&path)?;
            let mtime: DateTime<Utc> = metadata.modified()?.into();

            files.insert(
                rel_str.clone(),
                FileInfo {
                    path: rel_str,
                    size: metadata.len() as i64,
                    checksum,
                    mtime,
                },
            );
        }
    }

    Ok(())
}

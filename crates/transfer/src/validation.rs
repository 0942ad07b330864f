use std::path::{Component, Path};

use crate::TransferError;

/// Validates that a file path is relative and stays inside its project
/// directory.
///
/// Rejects empty paths, absolute paths, parent directory traversal and
/// Windows prefix components (`C:`, `\\server`). Root and prefix
/// components cover the absolute-path cases on every platform.
pub fn validate_relative_path(file_path: &str) -> Result<(), TransferError> {
    if file_path.is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    for component in Path::new(file_path).components() {
        let reason = match component {
            Component::ParentDir => "parent directory traversal",
            Component::RootDir => "absolute path",
            Component::Prefix(_) => "path prefix",
            Component::CurDir | Component::Normal(_) => continue,
        };
        return Err(TransferError::InvalidPath(format!(
            "{reason} not allowed: {file_path}"
        )));
    }

    Ok(())
}

//! Data types for the push flow.

use fieldsync_protocol::FileSet;

/// Event emitted while a push runs.
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// Chunk-level progress update.
    Progress {
        project_path: String,
        loaded: u32,
        total: u32,
    },
    /// Push completed; carries the server's resulting file state.
    Finished {
        project_path: String,
        files: FileSet,
    },
    /// Push was cancelled by the user. Not an error.
    Cancelled { project_path: String },
    /// Push failed; `error` is the user-facing detail.
    Failed { project_path: String, error: String },
}

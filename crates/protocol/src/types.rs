use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one version of one file within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Relative path within the project, `/`-separated. Unique key.
    pub path: String,
    /// File size in bytes.
    pub size: i64,
    /// Lowercase hex SHA-1 of the full file contents.
    pub checksum: String,
    /// Last modification time. Informational only; never used for
    /// change detection.
    pub mtime: DateTime<Utc>,
}

/// The complete known state of a project's files at a point in time,
/// keyed by relative path. Ordered so listings serialize and diff
/// deterministically.
pub type FileSet = BTreeMap<String, FileInfo>;

/// Sums the sizes of all files in a set.
pub fn total_size(files: &FileSet) -> i64 {
    files.values().map(|f| f.size).sum()
}

/// Lifecycle state of an upload session.
///
/// The "idle" state has no variant: an idle project path simply has no
/// session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "staged")]
    Staged,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "finished")]
    Finished,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl SessionStatus {
    /// Returns `true` while chunks are being transmitted.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }

    /// Returns `true` for states after which the session record is
    /// discarded.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Finished | SessionStatus::Failed | SessionStatus::Cancelled
        )
    }
}

/// Progress snapshot for an upload session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushProgress {
    pub project_path: String,
    pub status: SessionStatus,
    /// Chunks acknowledged by the server.
    pub loaded: u32,
    /// Chunks planned for this session.
    pub total: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl PushProgress {
    /// Returns progress as a percentage (0-100).
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.loaded) / f64::from(self.total) * 100.0
    }
}

use serde::{Deserialize, Serialize};

use crate::types::{FileInfo, FileSet};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Opens an upload session for one project's staged changes.
///
/// `added` and `updated` carry full metadata so the server can
/// pre-allocate entries; `removed` is paths only. Empty files appear in
/// `added`/`updated` with zero planned chunks and are materialized from
/// metadata alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSessionRequest {
    pub project_path: String,
    pub total_size: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<FileInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<FileInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

/// Header accompanying one chunk of upload data.
///
/// The chunk bytes travel out of band (request body); this header
/// identifies where they belong. `chunk_id` is the client-generated
/// token from planning, not a content address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkUploadRequest {
    pub session_id: String,
    pub chunk_id: String,
    pub file_path: String,
    /// Byte offset of this chunk within the file.
    pub offset: i64,
    /// SHA-1 of the chunk bytes, for transport integrity.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,
}

/// Finalizes an upload session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishSessionRequest {
    pub session_id: String,
}

/// Cancels an active upload session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSessionRequest {
    pub session_id: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Acknowledges session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSessionResponse {
    pub session_id: String,
}

/// Acknowledges one received chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkAck {
    pub session_id: String,
    pub chunk_id: String,
    pub bytes_written: i64,
}

/// Confirms session completion with the server's resulting file state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishSessionResponse {
    pub files: FileSet,
}

//! Wire types for fieldsync client/server communication.
//!
//! Payload structs serialize with camelCase field names to match the
//! server's JSON API. Nothing in this crate performs I/O; it only
//! defines the shapes the other crates exchange.

pub mod messages;
pub mod types;

pub use messages::{
    CancelSessionRequest, ChunkAck, ChunkUploadRequest, FinishSessionRequest,
    FinishSessionResponse, InitSessionRequest, InitSessionResponse,
};
pub use types::{FileInfo, FileSet, PushProgress, SessionStatus, total_size};

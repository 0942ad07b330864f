//! Streaming checksums, chunk planning and chunked file reads.
//!
//! Everything here is synchronous and blocking; async callers wrap the
//! file-touching entry points in `spawn_blocking`.

mod checksum;
mod chunked;
mod planner;
mod validation;

pub use checksum::{checksum_bytes, checksum_file, checksum_reader};
pub use chunked::{ChunkData, FileChunker};
pub use planner::{ChunkPlan, plan_chunks, plan_chunks_with};
pub use validation::validate_relative_path;

/// Upload chunk size: 10 MiB. Every chunk except a file's last one is
/// exactly this many bytes.
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Window size for streaming checksum reads: 256 KiB.
pub const CHECKSUM_WINDOW: usize = 256 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

use uuid::Uuid;

use crate::CHUNK_SIZE;

/// One planned upload chunk: an opaque client-generated token plus the
/// byte range it covers.
///
/// Tokens are random, not content-addressed; re-planning identical
/// bytes yields fresh ids. Chunk identity is a transport-sequencing
/// concern only, never a dedup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub id: String,
    /// Byte offset of this chunk within the file.
    pub offset: i64,
    /// Chunk length in bytes; equals the chunk size except possibly for
    /// the last chunk.
    pub size: usize,
}

/// Partitions `total_size` bytes into `ceil(total_size / CHUNK_SIZE)`
/// chunks.
///
/// A zero-length file plans zero chunks; callers that talk to a server
/// requiring at least one chunk must special-case empty files.
pub fn plan_chunks(total_size: i64) -> Vec<ChunkPlan> {
    plan_chunks_with(total_size, CHUNK_SIZE)
}

/// Like [`plan_chunks`] with an explicit chunk size.
pub fn plan_chunks_with(total_size: i64, chunk_size: usize) -> Vec<ChunkPlan> {
    if total_size <= 0 {
        return Vec::new();
    }

    let total = total_size as u64;
    let size = chunk_size as u64;
    let count = total.div_ceil(size);

    (0..count)
        .map(|i| {
            let offset = i * size;
            let len = std::cmp::min(size, total - offset);
            ChunkPlan {
                id: Uuid::new_v4().to_string(),
                offset: offset as i64,
                size: len as usize,
            }
        })
        .collect()
}

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::checksum::checksum_bytes;
use crate::{CHUNK_SIZE, TransferError};

/// One chunk of file data read from disk, ready to transmit.
#[derive(Debug, Clone)]
pub struct ChunkData {
    /// Byte offset within the file.
    pub offset: i64,
    /// Length of `data` in bytes.
    pub size: usize,
    /// Raw chunk bytes.
    pub data: Vec<u8>,
    /// SHA-1 hex checksum of `data`.
    pub checksum: String,
}

/// Reads a file sequentially in fixed-size chunks, one planner slot per
/// read. Supports seeking so a caller can start at any byte-range
/// boundary.
pub struct FileChunker {
    file: std::fs::File,
    chunk_size: usize,
    offset: i64,
    file_size: i64,
}

impl FileChunker {
    /// Opens `path` for chunked reading.
    ///
    /// A `chunk_size` of 0 falls back to [`CHUNK_SIZE`].
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len() as i64;
        let chunk_size = if chunk_size == 0 { CHUNK_SIZE } else { chunk_size };
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            file_size,
        })
    }

    /// Seeks to the given byte offset.
    pub fn seek_to(&mut self, offset: i64) -> Result<(), TransferError> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.offset = offset;
        Ok(())
    }

    /// Reads the next chunk. Returns `None` at end of file.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkData>, TransferError> {
        let remaining = self.file_size - self.offset;
        if remaining <= 0 {
            return Ok(None);
        }

        let want = std::cmp::min(remaining as usize, self.chunk_size);
        let mut buf = vec![0u8; want];
        self.file.read_exact(&mut buf)?;

        let checksum = checksum_bytes(&buf);
        let chunk = ChunkData {
            offset: self.offset,
            size: want,
            data: buf,
            checksum,
        };
        self.offset += want as i64;
        Ok(Some(chunk))
    }

    /// Current byte offset.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> i64 {
        self.file_size - self.offset
    }
}

use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::{CHECKSUM_WINDOW, TransferError};

/// Computes SHA-1 of `data` and returns the lowercase hex digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes SHA-1 of everything `reader` yields, reading in fixed
/// 256 KiB windows so arbitrarily large inputs never sit in memory at
/// once.
///
/// Any read error aborts the computation; no partial digest is
/// returned.
pub fn checksum_reader<R: Read>(mut reader: R) -> Result<String, TransferError> {
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; CHECKSUM_WINDOW];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Computes SHA-1 of an entire file and returns the lowercase hex
/// digest.
pub fn checksum_file(path: &Path) -> Result<String, TransferError> {
    let file = std::fs::File::open(path)?;
    checksum_reader(file)
}

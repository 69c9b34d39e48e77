//! SHA-256 content hashing for scanned files

use crate::error::ScanError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER: usize = 64 * 1024;

/// Hash a file's bytes, streaming so large binaries are never held in memory.
///
/// Returns the digest as lowercase hex.
pub fn hash_file(path: &Path) -> Result<String, ScanError> {
    let to_hash_error = |source| ScanError::Hash {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_hash_error)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER, file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_BUFFER];

    loop {
        let read = reader.read(&mut buf).map_err(to_hash_error)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compare two hex digests the way [`FileEntry`](super::FileEntry) equality does.
pub fn hashes_equal(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

//! Key Naming Module
//!
//! Maps cache keys to filesystem-safe file names and back.
//!
//! Keys are percent-encoded: every byte outside the unreserved set
//! (`A-Z a-z 0-9 - _ . ~`) is escaped, so path separators, reserved
//! characters and control bytes never reach the filesystem. The encoding
//! is deterministic and injective, which lets `keys()` recover the
//! original key straight from a directory listing.
//!
//! Keys whose encoded form would exceed the file name limit are stored
//! under a truncated encoded prefix, a `+`, and the hex SHA-256 of the full
//! key. Percent-encoding never emits a literal `+`, so these names cannot
//! collide with regular ones. They cannot be decoded either, so such keys
//! are readable by name but absent from `keys()`.

use sha2::{Digest, Sha256};

use crate::cache::MAX_FILE_NAME_LENGTH;
use crate::error::{CacheError, Result};

/// Separator between the prefix and digest of a hashed file name
const DIGEST_SEPARATOR: char = '+';

/// Length of a hex-encoded SHA-256 digest
const DIGEST_HEX_LENGTH: usize = 64;

// == Encode ==
/// Returns the file name backing `key`.
///
/// Fails with `InvalidKey` only for the empty key.
pub fn file_name_for(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }

    let encoded = urlencoding::encode(key);

    // "." and ".." survive percent-encoding untouched
    let name = if encoded.bytes().all(|b| b == b'.') {
        encoded.replace('.', "%2E")
    } else {
        encoded.into_owned()
    };

    if name.len() <= MAX_FILE_NAME_LENGTH {
        return Ok(name);
    }

    Ok(hashed_name(key, &name))
}

fn hashed_name(key: &str, encoded: &str) -> String {
    let mut end = MAX_FILE_NAME_LENGTH - DIGEST_HEX_LENGTH - 1;

    // Never cut through a %XX escape
    if let Some(pos) = encoded[..end].rfind('%') {
        if pos + 3 > end {
            end = pos;
        }
    }

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());

    format!(
        "{}{}{}",
        &encoded[..end],
        DIGEST_SEPARATOR,
        hex::encode(hasher.finalize())
    )
}

/// True for names produced for over-long keys.
pub fn is_hashed_name(file_name: &str) -> bool {
    file_name.contains(DIGEST_SEPARATOR)
}

// == Decode ==
/// Recovers the key from a backing file name.
///
/// Returns `None` for hashed names and for names this cache could not have
/// produced.
pub fn key_for(file_name: &str) -> Option<String> {
    if is_hashed_name(file_name) {
        return None;
    }

    let key = urlencoding::decode(file_name).ok()?.into_owned();

    match file_name_for(&key) {
        Ok(name) if name == file_name => Some(key),
        _ => None,
    }
}

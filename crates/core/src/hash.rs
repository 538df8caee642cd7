//! SHA-256 hashing utilities for the ledger.
//!
//! Digests are carried as lowercase hex strings because that is how they are
//! stored on disk and compared during validation. A stored digest may have
//! been tampered with, so nothing here assumes a string is well-formed.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// The previous-hash sentinel carried by the genesis record.
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Hash arbitrary data with SHA-256 and return lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check whether a hex digest starts with `difficulty` literal `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

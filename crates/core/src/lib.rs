//! Core ledger primitives for recipechain.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - SHA-256 hashing and the difficulty predicate
//! - Canonical encodings for the sealing digest and the anchoring fingerprint
//! - Recipe drafts, pending records, and sealed records

pub mod canonical;
pub mod hash;
pub mod record;

// Re-export commonly used types at the crate root
pub use canonical::{digest, fingerprint, SealingView};
pub use hash::{meets_difficulty, sha256_hex, HASH_HEX_LEN, ZERO_HASH};
pub use record::{
    current_timestamp, ExternalAck, PendingRecord, RecipeDraft, Record, RecordError,
};

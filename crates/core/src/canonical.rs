//! Canonical JSON encodings for record digests.
//!
//! Two encodings exist and they are deliberately different:
//! - The **sealing** encoding: compact JSON with keys in sorted order, covering
//!   every field except `hash` and `onchain`. Its SHA-256 is the record hash
//!   that proof of work targets and that links the chain.
//! - The **fingerprint** encoding: pretty-printed JSON (2-space indent) of a
//!   fixed field list in a fixed, unsorted order, including the sealed hash.
//!   Its SHA-256 is the commitment handed to an external anchoring service.
//!
//! Both must stay byte-compatible with chains already on disk, so the field
//! order is fixed by struct declaration order rather than by a map type.

use crate::hash::sha256_hex;
use crate::record::Record;
use serde::{Serialize, Serializer};

/// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The fields covered by the sealing digest, in sorted key order.
///
/// Field declaration order is the serialization order. Keep it sorted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SealingView<'a> {
    pub creator: &'a str,
    pub index: u64,
    pub ingredients: &'a [String],
    pub nonce: u64,
    pub previous_hash: &'a str,
    pub steps: &'a [String],
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: f64,
    pub title: &'a str,
}

/// The fields covered by the anchoring fingerprint, in commitment order.
#[derive(Serialize)]
struct FingerprintView<'a> {
    index: u64,
    title: &'a str,
    ingredients: &'a [String],
    steps: &'a [String],
    creator: &'a str,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: f64,
    previous_hash: &'a str,
    hash: &'a str,
}

/// Write whole-number timestamps as integers (`1700000000`, not
/// `1700000000.0`) so encodings match chains written by earlier tooling.
fn serialize_timestamp<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Encode the sealed fields as compact, key-sorted JSON.
pub fn sealing_bytes(view: &SealingView<'_>) -> Vec<u8> {
    // Plain strings, string slices, and numbers cannot fail to serialize.
    serde_json::to_vec(view).unwrap_or_default()
}

/// Compute the sealing digest of a record.
pub fn digest(view: &SealingView<'_>) -> String {
    sha256_hex(&sealing_bytes(view))
}

/// Encode the fingerprinted fields as pretty-printed JSON.
pub fn fingerprint_bytes(record: &Record) -> Vec<u8> {
    let view = FingerprintView {
        index: record.index,
        title: &record.title,
        ingredients: &record.ingredients,
        steps: &record.steps,
        creator: &record.creator,
        timestamp: record.timestamp,
        previous_hash: &record.previous_hash,
        hash: &record.hash,
    };
    serde_json::to_vec_pretty(&view).unwrap_or_default()
}

/// Compute the `0x`-prefixed anchoring fingerprint of a sealed record.
pub fn fingerprint(record: &Record) -> String {
    format!("0x{}", sha256_hex(&fingerprint_bytes(record)))
}

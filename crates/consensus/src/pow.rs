//! Proof of Work sealing.
//!
//! A record is sealed by searching nonces upward from zero until its digest
//! starts with `difficulty` hex zeros. The search is deterministic: the same
//! pending record and difficulty always yield the same nonce and digest. The
//! expected number of attempts is 16^difficulty.

use recipechain_core::{meets_difficulty, PendingRecord, Record, HASH_HEX_LEN};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Default number of leading zero hex characters.
pub const DEFAULT_DIFFICULTY: usize = 2;

/// Smallest accepted difficulty.
pub const MIN_DIFFICULTY: usize = 1;

/// Attempts between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 256;

/// Errors that can occur while sealing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    #[error("no qualifying nonce within {attempts} attempts")]
    Exhausted { attempts: u64 },

    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

pub type Result<T> = std::result::Result<T, MiningError>;

/// Proof of Work configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowConfig {
    /// Required number of leading `'0'` characters in a sealed hash.
    pub difficulty: usize,
    /// Give up after this many attempts (`None` searches without bound).
    pub max_attempts: Option<u64>,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
        }
    }
}

impl PowConfig {
    /// Create an unbounded configuration with the given difficulty.
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty,
            max_attempts: None,
        }
    }

    /// Limit the number of attempts per seal.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Difficulty clamped to what a hex SHA-256 digest can satisfy.
    pub fn effective_difficulty(&self) -> usize {
        self.difficulty.clamp(MIN_DIFFICULTY, HASH_HEX_LEN)
    }
}

/// Cooperative cancellation flag for a running search.
///
/// Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask any search observing this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Seals pending records by nonce search.
#[derive(Debug, Clone)]
pub struct Miner {
    difficulty: usize,
    max_attempts: Option<u64>,
}

impl Miner {
    /// Create a miner from the given configuration.
    pub fn new(config: &PowConfig) -> Self {
        let difficulty = config.effective_difficulty();
        if difficulty != config.difficulty {
            tracing::warn!(
                requested = config.difficulty,
                difficulty,
                "difficulty out of range, clamped"
            );
        }
        Self {
            difficulty,
            max_attempts: config.max_attempts,
        }
    }

    /// Get the difficulty this miner seals at.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Search for the first qualifying nonce, starting from zero.
    ///
    /// On success the record's `nonce` is left at the winning value and the
    /// digest is returned. On failure the nonce is unspecified.
    pub fn seal(&self, record: &mut PendingRecord) -> Result<String> {
        self.search(record, None)
    }

    /// Like [`Miner::seal`], but stops early when `cancel` is triggered.
    pub fn seal_with_cancel(&self, record: &mut PendingRecord, cancel: &CancelToken) -> Result<String> {
        self.search(record, Some(cancel))
    }

    /// Seal a pending record into a [`Record`].
    pub fn mine(&self, mut record: PendingRecord) -> Result<Record> {
        let hash = self.seal(&mut record)?;
        Ok(record.into_sealed(hash))
    }

    /// Seal a pending record into a [`Record`], observing `cancel`.
    pub fn mine_with_cancel(&self, mut record: PendingRecord, cancel: &CancelToken) -> Result<Record> {
        let hash = self.seal_with_cancel(&mut record, cancel)?;
        Ok(record.into_sealed(hash))
    }

    fn search(&self, record: &mut PendingRecord, cancel: Option<&CancelToken>) -> Result<String> {
        record.nonce = 0;
        let mut attempts: u64 = 0;

        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(MiningError::Exhausted { attempts });
                }
            }
            if let Some(token) = cancel {
                if attempts % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
                    return Err(MiningError::Cancelled { attempts });
                }
            }

            let hash = record.digest();
            attempts += 1;
            if meets_difficulty(&hash, self.difficulty) {
                tracing::debug!(
                    index = record.index,
                    nonce = record.nonce,
                    attempts,
                    "record sealed"
                );
                return Ok(hash);
            }
            record.nonce += 1;
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(&PowConfig::default())
    }
}

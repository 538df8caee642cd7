//! Proof of Work sealing and chain validation for recipechain.
//!
//! This crate provides:
//! - Nonce search that seals pending records at a fixed difficulty
//! - Cooperative cancellation and attempt limits for long searches
//! - Whole-chain and single-record validation
//!
//! # Example
//!
//! ```rust
//! use recipechain_consensus::{ChainValidator, Miner, PowConfig};
//! use recipechain_core::PendingRecord;
//!
//! let miner = Miner::new(&PowConfig::new(1));
//! let genesis = miner.mine(PendingRecord::genesis()).unwrap();
//!
//! let verdict = ChainValidator::validate_all(&[genesis]);
//! assert!(verdict.valid);
//! ```

pub mod pow;
pub mod validator;

// Re-export commonly used types
pub use pow::{CancelToken, Miner, MiningError, PowConfig, DEFAULT_DIFFICULTY, MIN_DIFFICULTY};
pub use validator::{ChainFault, ChainValidator, Verdict};

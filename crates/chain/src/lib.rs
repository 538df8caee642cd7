//! Ledger facade for recipechain.
//!
//! This crate brings together all components into one shareable ledger:
//! - **Sealing**: Proof of Work nonce search at a fixed difficulty
//! - **Storage**: The chain in memory, mirrored to one JSON file
//! - **Validation**: On-demand digest and link checks
//! - **Anchoring**: Fingerprints and external acknowledgments
//!
//! # Example
//!
//! ```rust,no_run
//! use recipechain_chain::{Ledger, LedgerConfig};
//! use recipechain_core::RecipeDraft;
//! use std::sync::Arc;
//!
//! // Open (or create) the ledger
//! let ledger = Arc::new(Ledger::open(LedgerConfig::new("./data/blockchain.json", 2)).unwrap());
//!
//! // Append a recipe
//! let draft = RecipeDraft::new(
//!     "Soup",
//!     vec!["water".into(), "salt".into()],
//!     vec!["Boil".into()],
//!     "Ana",
//! );
//! let record = ledger.append(draft).unwrap();
//!
//! // Verify it, and with it the whole chain
//! assert!(ledger.verify_record(record.index).valid);
//! ```

pub mod ledger;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerConfig, LedgerError, LedgerStats, Result, DEFAULT_STORAGE_PATH};
pub use recipechain_consensus::{CancelToken, ChainFault, PowConfig, Verdict};

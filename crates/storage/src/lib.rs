//! Persistent chain storage for recipechain.
//!
//! This crate keeps the ledger's ordered sequence of sealed records in memory
//! and mirrors it to a single JSON file:
//! - Ledger file access with atomic, whole-file rewrites
//! - Genesis creation when the file is absent or unusable
//! - Appending sealed records and attaching external acknowledgments
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Application Layer                      │
//! │                 (Ledger facade, CLI)                     │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   Storage Layer                          │
//! │  ┌──────────────────────────┐  ┌──────────────────────┐  │
//! │  │ ChainStore               │  │ Storage (file)       │  │
//! │  │  - in-memory sequence    │  │  - JSON array        │  │
//! │  │  - genesis on bad load   │  │  - temp + rename     │  │
//! │  │  - append / attach ack   │  │  - read outcomes     │  │
//! │  └──────────────────────────┘  └──────────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                 blockchain.json                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use recipechain_consensus::{Miner, PowConfig};
//! use recipechain_core::RecipeDraft;
//! use recipechain_storage::{ChainStore, Storage};
//!
//! let storage = Storage::open("./data/blockchain.json");
//! let mut chain = ChainStore::load(storage, Miner::new(&PowConfig::new(2))).unwrap();
//!
//! let draft = RecipeDraft::new("Soup", vec!["water".into()], vec!["Boil".into()], "Ana");
//! let record = chain.append(draft).unwrap();
//! assert_eq!(record.index, 1);
//! ```

pub mod chain;
pub mod db;

// Re-export commonly used types
pub use chain::ChainStore;
pub use db::{ReadOutcome, Result, Storage, StorageError};

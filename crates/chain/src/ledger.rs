//! The ledger facade.
//!
//! This module brings together sealing, storage, and validation behind one
//! explicitly owned handle that can be shared between threads.

use recipechain_consensus::{CancelToken, ChainValidator, Miner, MiningError, PowConfig, Verdict};
use recipechain_core::{ExternalAck, RecipeDraft, Record, RecordError};
use recipechain_storage::{ChainStore, Storage, StorageError};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Default location of the ledger file.
pub const DEFAULT_STORAGE_PATH: &str = "./data/blockchain.json";

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("mining error: {0}")]
    Mining(#[from] MiningError),

    #[error("invalid recipe: {0}")]
    InvalidRecipe(#[from] RecordError),

    #[error("record not found: {0}")]
    RecordNotFound(u64),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Path of the JSON ledger file.
    pub storage_path: PathBuf,
    /// Proof of Work settings, fixed for the ledger's lifetime.
    pub pow: PowConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            pow: PowConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Create a configuration for the given file and difficulty.
    pub fn new(storage_path: impl Into<PathBuf>, difficulty: usize) -> Self {
        Self {
            storage_path: storage_path.into(),
            pow: PowConfig::new(difficulty),
        }
    }
}

/// Ledger statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStats {
    /// Number of records, genesis included.
    pub length: usize,
    /// Difficulty every new record is sealed at.
    pub difficulty: usize,
    /// Hash of the latest record.
    pub tail_hash: String,
    /// Timestamp of the latest record.
    pub tail_timestamp: f64,
    /// Records carrying an external acknowledgment.
    pub anchored: usize,
}

/// Append-only, tamper-evident recipe ledger.
///
/// Writers (append, attach) are serialized; readers always see a consistent
/// sequence from before or after a write. Sealing runs without holding the
/// chain lock, so snapshots and validation stay responsive while a record is
/// being mined.
pub struct Ledger {
    /// Serializes writers across the whole prepare/mine/commit sequence.
    writer: Mutex<()>,
    /// The chain itself, which also owns the miner.
    chain: RwLock<ChainStore>,
}

impl Ledger {
    /// Open the ledger, loading the chain or creating its genesis record.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let storage = Storage::open(&config.storage_path);
        let chain = ChainStore::load(storage, Miner::new(&config.pow))?;

        tracing::info!(
            path = %config.storage_path.display(),
            length = chain.len(),
            difficulty = chain.miner().difficulty(),
            "ledger opened"
        );

        Ok(Self {
            writer: Mutex::new(()),
            chain: RwLock::new(chain),
        })
    }

    /// Get the difficulty new records are sealed at.
    pub fn difficulty(&self) -> usize {
        self.read().miner().difficulty()
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Always false: a ledger holds at least its genesis record.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the full ordered sequence.
    pub fn records(&self) -> Vec<Record> {
        self.read().snapshot().to_vec()
    }

    /// Get a record by index.
    pub fn record(&self, index: u64) -> Option<Record> {
        self.read().get(index).cloned()
    }

    /// Get the latest record.
    pub fn latest(&self) -> Record {
        self.read().tail().clone()
    }

    /// Sanitize, seal, and append a recipe.
    ///
    /// Blocks until the proof of work completes.
    pub fn append(&self, draft: RecipeDraft) -> Result<Record> {
        self.append_inner(draft, None)
    }

    /// Like [`Ledger::append`], but gives up when `cancel` is triggered.
    ///
    /// A cancelled append leaves the chain untouched.
    pub fn append_with_cancel(&self, draft: RecipeDraft, cancel: &CancelToken) -> Result<Record> {
        self.append_inner(draft, Some(cancel))
    }

    fn append_inner(&self, draft: RecipeDraft, cancel: Option<&CancelToken>) -> Result<Record> {
        let draft = draft.sanitize()?;
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        // Take what mining needs, then release the read lock before the search.
        let (pending, miner) = {
            let chain = self.read();
            (chain.prepare(draft), chain.miner().clone())
        };
        let record = match cancel {
            Some(token) => miner.mine_with_cancel(pending, token)?,
            None => miner.mine(pending)?,
        };

        let record = self.write().commit(record)?;
        tracing::info!(
            index = record.index,
            nonce = record.nonce,
            hash = %record.hash,
            "record appended"
        );
        Ok(record)
    }

    /// Attach an external anchoring acknowledgment to a sealed record.
    pub fn attach_ack(&self, index: u64, ack: ExternalAck) -> Result<Record> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let record = self.write().attach_ack(index, ack).map_err(|e| match e {
            StorageError::NotFound(i) => LedgerError::RecordNotFound(i),
            other => LedgerError::Storage(other),
        })?;

        tracing::info!(
            index,
            confirmed = record.onchain.as_ref().is_some_and(ExternalAck::is_confirmed),
            "external acknowledgment attached"
        );
        Ok(record)
    }

    /// Fingerprint to submit to an external anchoring service.
    pub fn fingerprint(&self, index: u64) -> Result<String> {
        self.read()
            .get(index)
            .map(Record::fingerprint)
            .ok_or(LedgerError::RecordNotFound(index))
    }

    /// Verify one record's own hash, then the whole chain.
    pub fn verify_record(&self, index: u64) -> Verdict {
        let chain = self.read();
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        ChainValidator::validate_one(chain.snapshot(), index)
    }

    /// Verify every hash and link in the chain.
    pub fn validate_chain(&self) -> Verdict {
        ChainValidator::validate_all(self.read().snapshot())
    }

    /// Get ledger statistics.
    pub fn stats(&self) -> LedgerStats {
        let chain = self.read();
        let tail = chain.tail();
        LedgerStats {
            length: chain.len(),
            difficulty: chain.miner().difficulty(),
            tail_hash: tail.hash.clone(),
            tail_timestamp: tail.timestamp,
            anchored: chain.snapshot().iter().filter(|r| r.is_anchored()).count(),
        }
    }

    // The chain is only mutated after every fallible step has succeeded, so a
    // poisoned lock still guards a consistent sequence.
    fn read(&self) -> RwLockReadGuard<'_, ChainStore> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChainStore> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_ledger(difficulty: usize) -> (TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::new(dir.path().join("blockchain.json"), difficulty);
        let ledger = Ledger::open(config).unwrap();
        (dir, ledger)
    }

    fn soup() -> RecipeDraft {
        RecipeDraft::new(
            "Soup",
            vec!["water".into(), "salt".into()],
            vec!["Boil".into()],
            "Ana",
        )
    }

    #[test]
    fn test_ledger_init() {
        let (_dir, ledger) = setup_ledger(2);

        assert_eq!(ledger.len(), 1);
        assert!(ledger.latest().is_genesis());
        assert_eq!(ledger.difficulty(), 2);
    }

    #[test]
    fn test_difficulty_follows_chain_miner() {
        let (_dir, ledger) = setup_ledger(0);

        assert_eq!(ledger.difficulty(), 1);
        assert_eq!(ledger.stats().difficulty, 1);
        let record = ledger.append(soup()).unwrap();
        assert!(record.hash.starts_with('0'));
        assert!(ledger.validate_chain().valid);
    }

    #[test]
    fn test_append_soup() {
        let (_dir, ledger) = setup_ledger(2);
        let genesis = ledger.latest();

        let record = ledger.append(soup()).unwrap();

        assert_eq!(record.index, 1);
        assert_eq!(record.previous_hash, genesis.hash);
        assert!(record.hash.starts_with("00"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_append_sanitizes() {
        let (_dir, ledger) = setup_ledger(1);
        let draft = RecipeDraft::new(
            " Soup ",
            vec!["water".into(), " ".into()],
            vec![" Boil".into()],
            "Ana ",
        );

        let record = ledger.append(draft).unwrap();
        assert_eq!(record.title, "Soup");
        assert_eq!(record.ingredients, vec!["water"]);
        assert_eq!(record.steps, vec!["Boil"]);
        assert_eq!(record.creator, "Ana");
    }

    #[test]
    fn test_append_rejects_invalid_recipe() {
        let (_dir, ledger) = setup_ledger(1);
        let draft = RecipeDraft::new("Soup", vec![], vec!["Boil".into()], "Ana");

        let result = ledger.append(draft);
        assert!(matches!(
            result,
            Err(LedgerError::InvalidRecipe(RecordError::NoIngredients))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_cancelled_append_leaves_chain() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            storage_path: dir.path().join("blockchain.json"),
            pow: PowConfig::new(1),
        };
        let ledger = Ledger::open(config).unwrap();
        let token = CancelToken::new();
        token.cancel();

        let result = ledger.append_with_cancel(soup(), &token);
        assert!(matches!(
            result,
            Err(LedgerError::Mining(MiningError::Cancelled { .. }))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_attach_ack_not_found() {
        let (_dir, ledger) = setup_ledger(1);
        let ack = ExternalAck::Failed {
            fingerprint: "0x00".into(),
            error_message: "unreachable".into(),
        };

        let result = ledger.attach_ack(3, ack);
        assert!(matches!(result, Err(LedgerError::RecordNotFound(3))));
    }

    #[test]
    fn test_fingerprint() {
        let (_dir, ledger) = setup_ledger(1);
        let record = ledger.append(soup()).unwrap();

        assert_eq!(ledger.fingerprint(1).unwrap(), record.fingerprint());
        assert!(matches!(
            ledger.fingerprint(9),
            Err(LedgerError::RecordNotFound(9))
        ));
    }

    #[test]
    fn test_ledger_stats() {
        let (_dir, ledger) = setup_ledger(1);
        let record = ledger.append(soup()).unwrap();
        ledger
            .attach_ack(
                1,
                ExternalAck::Confirmed {
                    fingerprint: record.fingerprint(),
                    confirmation_id: "0xabc".into(),
                },
            )
            .unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.length, 2);
        assert_eq!(stats.difficulty, 1);
        assert_eq!(stats.tail_hash, record.hash);
        assert_eq!(stats.anchored, 1);
    }
}

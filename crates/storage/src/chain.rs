//! In-memory chain backed by a ledger file.

use crate::db::{ReadOutcome, Result, Storage, StorageError};
use recipechain_consensus::Miner;
use recipechain_core::{ExternalAck, PendingRecord, RecipeDraft, Record};

/// Owns the ordered sequence of sealed records and keeps the ledger file in
/// step with it.
///
/// The sequence is never empty: loading falls back to a freshly sealed
/// genesis record when the file is absent or unusable.
pub struct ChainStore {
    storage: Storage,
    miner: Miner,
    records: Vec<Record>,
}

impl ChainStore {
    /// Load the chain from storage, creating and persisting a genesis record
    /// if there is nothing usable on disk.
    ///
    /// Loaded records are adopted verbatim. They are not re-validated and not
    /// re-mined; validation is always an explicit, separate step.
    pub fn load(storage: Storage, miner: Miner) -> Result<Self> {
        let mut store = Self {
            storage,
            miner,
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the ledger file, replacing the in-memory sequence.
    pub fn reload(&mut self) -> Result<()> {
        match self.storage.read() {
            ReadOutcome::Loaded(records) => {
                tracing::debug!(
                    path = %self.storage.path().display(),
                    length = records.len(),
                    "loaded chain"
                );
                self.records = records;
                return Ok(());
            }
            ReadOutcome::Missing => {
                tracing::info!(
                    path = %self.storage.path().display(),
                    "no ledger file, creating genesis"
                );
            }
            ReadOutcome::Corrupt(reason) => {
                tracing::warn!(
                    path = %self.storage.path().display(),
                    %reason,
                    "could not load ledger file, recreating genesis"
                );
            }
        }

        let genesis = self.miner.mine(PendingRecord::genesis())?;
        self.storage.write(std::slice::from_ref(&genesis))?;
        tracing::info!(hash = %genesis.hash, nonce = genesis.nonce, "genesis record sealed");
        self.records = vec![genesis];
        Ok(())
    }

    // =========================================================================
    // Chain Access
    // =========================================================================

    /// The full ordered sequence.
    pub fn snapshot(&self) -> &[Record] {
        &self.records
    }

    /// Get a record by index.
    pub fn get(&self, index: u64) -> Option<&Record> {
        usize::try_from(index).ok().and_then(|i| self.records.get(i))
    }

    /// Get the latest record.
    pub fn tail(&self) -> &Record {
        // Non-empty after load.
        &self.records[self.records.len() - 1]
    }

    /// Number of records, genesis included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false after load; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the miner used to seal new records.
    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    /// Get the backing storage.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // =========================================================================
    // Chain Operations
    // =========================================================================

    /// Place a draft at the tail: next index, tail's hash as the link,
    /// current time, nonce zero.
    pub fn prepare(&self, draft: RecipeDraft) -> PendingRecord {
        PendingRecord::new(self.records.len() as u64, self.tail().hash.clone(), draft)
    }

    /// Append an already sealed record and persist the whole sequence.
    ///
    /// This validates that:
    /// - The record index is exactly the current length
    /// - The record's previous hash is the current tail's hash
    ///
    /// Note: This does NOT check the proof of work. Records are expected to
    /// come from [`ChainStore::prepare`] and the miner.
    pub fn commit(&mut self, record: Record) -> Result<Record> {
        let expected = self.records.len() as u64;
        if record.index != expected {
            return Err(StorageError::StaleTail {
                expected,
                got: record.index,
            });
        }
        if record.previous_hash != self.tail().hash {
            return Err(StorageError::BrokenLink(record.index));
        }

        self.records.push(record);
        if let Err(e) = self.storage.write(&self.records) {
            self.records.pop();
            return Err(e);
        }

        Ok(self.tail().clone())
    }

    /// Prepare, seal, and commit a draft in one step.
    ///
    /// Mines while holding `&mut self`. Callers that share the store and want
    /// readers to proceed during the search use `prepare`, the `miner`, and
    /// `commit` separately.
    pub fn append(&mut self, draft: RecipeDraft) -> Result<Record> {
        let pending = self.prepare(draft);
        let record = self.miner.mine(pending)?;
        self.commit(record)
    }

    /// Attach an external acknowledgment to a sealed record and persist.
    ///
    /// The record's hash is left untouched. Each record accepts one
    /// acknowledgment.
    pub fn attach_ack(&mut self, index: u64, ack: ExternalAck) -> Result<Record> {
        let i = usize::try_from(index)
            .ok()
            .filter(|i| *i < self.records.len())
            .ok_or(StorageError::NotFound(index))?;

        if self.records[i].onchain.is_some() {
            return Err(StorageError::AlreadyAnchored(index));
        }

        self.records[i].onchain = Some(ack);
        if let Err(e) = self.storage.write(&self.records) {
            self.records[i].onchain = None;
            return Err(e);
        }

        Ok(self.records[i].clone())
    }
}

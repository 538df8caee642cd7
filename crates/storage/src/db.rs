//! JSON file storage with atomic rewrites.

use recipechain_consensus::MiningError;
use recipechain_core::Record;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist ledger file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Mining error: {0}")]
    Mining(#[from] MiningError),

    #[error("Record not found: {0}")]
    NotFound(u64),

    #[error("Record {0} already has an external acknowledgment")]
    AlreadyAnchored(u64),

    #[error("Record does not extend the chain tail: expected index {expected}, got {got}")]
    StaleTail { expected: u64, got: u64 },

    #[error("Record {0} does not link to the chain tail")]
    BrokenLink(u64),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// What was found at the storage path.
#[derive(Debug)]
pub enum ReadOutcome {
    /// No file exists yet.
    Missing,
    /// A file exists but is unreadable, unparseable, or empty.
    Corrupt(String),
    /// A non-empty sequence of records.
    Loaded(Vec<Record>),
}

/// A ledger file holding the full ordered sequence as a JSON array.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Use the file at the given path. Nothing is created until the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the ledger file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse the ledger file.
    ///
    /// Never fails: every problem is reported as an outcome so the caller can
    /// decide how to recover.
    pub fn read(&self) -> ReadOutcome {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ReadOutcome::Missing,
            Err(e) => return ReadOutcome::Corrupt(format!("unreadable: {}", e)),
        };

        match serde_json::from_slice::<Vec<Record>>(&raw) {
            Ok(records) if records.is_empty() => ReadOutcome::Corrupt("empty sequence".into()),
            Ok(records) => ReadOutcome::Loaded(records),
            Err(e) => ReadOutcome::Corrupt(format!("unparseable: {}", e)),
        }
    }

    /// Replace the ledger file with the given sequence.
    ///
    /// The new contents are written to a temporary file in the same directory
    /// and renamed over the old file, so readers see either the old or the
    /// new sequence, never a partial write.
    pub fn write(&self, records: &[Record]) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(records)?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(&encoded)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipechain_consensus::{Miner, PowConfig};
    use recipechain_core::PendingRecord;

    fn genesis() -> Record {
        Miner::new(&PowConfig::new(1))
            .mine(PendingRecord::genesis())
            .unwrap()
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("chain.json"));

        assert!(!storage.exists());
        assert!(matches!(storage.read(), ReadOutcome::Missing));
    }

    #[test]
    fn test_write_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("nested").join("chain.json"));
        let records = vec![genesis()];

        storage.write(&records).unwrap();
        assert!(storage.exists());

        match storage.read() {
            ReadOutcome::Loaded(loaded) => assert_eq!(loaded, records),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_written_file_is_pretty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("chain.json"));
        storage.write(&[genesis()]).unwrap();

        let text = fs::read_to_string(storage.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"index\": 0,"));
        assert!(!text.contains("onchain"));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, b"{not json").unwrap();

        assert!(matches!(Storage::open(&path).read(), ReadOutcome::Corrupt(_)));
    }

    #[test]
    fn test_empty_array_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, b"[]").unwrap();

        assert!(matches!(Storage::open(&path).read(), ReadOutcome::Corrupt(_)));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, br#"[{"index": 0, "title": "missing everything else"}]"#).unwrap();

        assert!(matches!(Storage::open(&path).read(), ReadOutcome::Corrupt(_)));
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("chain.json"));

        let first = genesis();
        storage.write(&[first.clone()]).unwrap();

        let mut second = first.clone();
        second.title = "Replaced".into();
        storage.write(&[second.clone()]).unwrap();

        match storage.read() {
            ReadOutcome::Loaded(loaded) => assert_eq!(loaded, vec![second]),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

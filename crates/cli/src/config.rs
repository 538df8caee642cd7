//! Per-data-directory configuration.
//!
//! `init` writes `config.json` next to the ledger file; every other command
//! reads it back so the difficulty stays fixed for the ledger's lifetime.

use anyhow::{Context, Result};
use recipechain_chain::{LedgerConfig, PowConfig};
use recipechain_consensus::DEFAULT_DIFFICULTY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Name of the ledger file inside the data directory.
pub const LEDGER_FILE: &str = "blockchain.json";

/// Settings persisted in `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Leading zero hex characters required of every sealed hash.
    pub difficulty: usize,
    /// Per-record cap on nonce attempts (`null` for no cap).
    #[serde(default)]
    pub max_attempts: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
        }
    }
}

impl CliConfig {
    /// Load `config.json` from the data directory, or defaults if it is missing.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Write `config.json` into the data directory.
    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;
        let path = data_dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Ledger configuration for a ledger living in `data_dir`.
    pub fn ledger_config(&self, data_dir: &Path) -> LedgerConfig {
        let mut pow = PowConfig::new(self.difficulty);
        pow.max_attempts = self.max_attempts;
        LedgerConfig {
            storage_path: data_dir.join(LEDGER_FILE),
            pow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CliConfig::load(dir.path()).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            difficulty: 3,
            max_attempts: Some(1_000_000),
        };

        config.save(dir.path()).unwrap();
        assert_eq!(CliConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{\"difficulty\": \"high\"}").unwrap();
        assert!(CliConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_ledger_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            difficulty: 4,
            max_attempts: None,
        }
        .ledger_config(dir.path());

        assert_eq!(config.storage_path, dir.path().join(LEDGER_FILE));
        assert_eq!(config.pow.difficulty, 4);
        assert_eq!(config.pow.max_attempts, None);
    }
}

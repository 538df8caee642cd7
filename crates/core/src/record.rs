//! Recipe records: drafts, pending (unsealed) records, and sealed records.

use crate::canonical::{self, SealingView};
use crate::hash::ZERO_HASH;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Title of the genesis record.
pub const GENESIS_TITLE: &str = "Genesis Recipe";
/// Ingredients of the genesis record.
pub const GENESIS_INGREDIENTS: [&str; 2] = ["love", "curiosity"];
/// Steps of the genesis record.
pub const GENESIS_STEPS: [&str; 1] = ["Boot the blockchain."];
/// Creator recorded on the genesis record.
pub const SYSTEM_CREATOR: &str = "system";

/// Errors raised when a recipe draft is not acceptable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("creator must not be empty")]
    EmptyCreator,

    #[error("at least one ingredient is required")]
    NoIngredients,

    #[error("at least one step is required")]
    NoSteps,
}

/// A recipe submitted for inclusion in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub creator: String,
}

impl RecipeDraft {
    /// Create a new draft from its parts.
    pub fn new(
        title: impl Into<String>,
        ingredients: Vec<String>,
        steps: Vec<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            ingredients,
            steps,
            creator: creator.into(),
        }
    }

    /// Trim every field, drop blank list entries, and reject drafts that end
    /// up with an empty title, creator, ingredient list, or step list.
    pub fn sanitize(self) -> Result<Self, RecordError> {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        };

        let draft = Self {
            title: self.title.trim().to_string(),
            ingredients: clean(self.ingredients),
            steps: clean(self.steps),
            creator: self.creator.trim().to_string(),
        };

        if draft.title.is_empty() {
            return Err(RecordError::EmptyTitle);
        }
        if draft.creator.is_empty() {
            return Err(RecordError::EmptyCreator);
        }
        if draft.ingredients.is_empty() {
            return Err(RecordError::NoIngredients);
        }
        if draft.steps.is_empty() {
            return Err(RecordError::NoSteps);
        }

        Ok(draft)
    }
}

/// Acknowledgment returned by an external anchoring service.
///
/// On disk this is the `onchain` object: `{dataHash, txHash}` when the
/// anchor was confirmed or `{dataHash, error}` when it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum ExternalAck {
    Confirmed {
        #[serde(rename = "dataHash")]
        fingerprint: String,
        #[serde(rename = "txHash")]
        confirmation_id: String,
    },
    Failed {
        #[serde(rename = "dataHash")]
        fingerprint: String,
        #[serde(rename = "error")]
        error_message: String,
    },
}

impl ExternalAck {
    /// The fingerprint that was submitted to the anchoring service.
    pub fn fingerprint(&self) -> &str {
        match self {
            Self::Confirmed { fingerprint, .. } | Self::Failed { fingerprint, .. } => fingerprint,
        }
    }

    /// Whether the anchoring service confirmed the submission.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// A record placed at the tail of the chain but not yet sealed.
///
/// Only the miner turns this into a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    pub index: u64,
    pub timestamp: f64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub creator: String,
    pub previous_hash: String,
    pub nonce: u64,
}

impl PendingRecord {
    /// Place a draft at `index`, linked to `previous_hash`.
    pub fn new(index: u64, previous_hash: impl Into<String>, draft: RecipeDraft) -> Self {
        Self {
            index,
            timestamp: current_timestamp(),
            title: draft.title,
            ingredients: draft.ingredients,
            steps: draft.steps,
            creator: draft.creator,
            previous_hash: previous_hash.into(),
            nonce: 0,
        }
    }

    /// Create the unsealed genesis record.
    pub fn genesis() -> Self {
        let draft = RecipeDraft {
            title: GENESIS_TITLE.to_string(),
            ingredients: GENESIS_INGREDIENTS.iter().map(|s| s.to_string()).collect(),
            steps: GENESIS_STEPS.iter().map(|s| s.to_string()).collect(),
            creator: SYSTEM_CREATOR.to_string(),
        };
        Self::new(0, ZERO_HASH, draft)
    }

    /// Borrow the fields covered by the sealing digest.
    pub fn sealing_view(&self) -> SealingView<'_> {
        SealingView {
            creator: &self.creator,
            index: self.index,
            ingredients: &self.ingredients,
            nonce: self.nonce,
            previous_hash: &self.previous_hash,
            steps: &self.steps,
            timestamp: self.timestamp,
            title: &self.title,
        }
    }

    /// Compute the digest at the current nonce.
    pub fn digest(&self) -> String {
        canonical::digest(&self.sealing_view())
    }

    /// Fix `hash` as this record's identity.
    ///
    /// The caller is responsible for `hash` being the digest at the current
    /// nonce; the miner is the only intended caller.
    pub fn into_sealed(self, hash: String) -> Record {
        Record {
            index: self.index,
            timestamp: self.timestamp,
            title: self.title,
            ingredients: self.ingredients,
            steps: self.steps,
            creator: self.creator,
            previous_hash: self.previous_hash,
            nonce: self.nonce,
            hash,
            onchain: None,
        }
    }
}

/// A sealed ledger record, exactly as it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Position in the chain (0 for genesis).
    pub index: u64,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: f64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub creator: String,
    /// Hash of the preceding record, or [`ZERO_HASH`] for genesis.
    pub previous_hash: String,
    /// Nonce found by the proof-of-work search.
    pub nonce: u64,
    /// Sealed digest of every field above.
    pub hash: String,
    /// External anchoring acknowledgment, attached after sealing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onchain: Option<ExternalAck>,
}

impl Record {
    /// Borrow the fields covered by the sealing digest.
    pub fn sealing_view(&self) -> SealingView<'_> {
        SealingView {
            creator: &self.creator,
            index: self.index,
            ingredients: &self.ingredients,
            nonce: self.nonce,
            previous_hash: &self.previous_hash,
            steps: &self.steps,
            timestamp: self.timestamp,
            title: &self.title,
        }
    }

    /// Recompute the sealing digest from the stored fields.
    pub fn compute_hash(&self) -> String {
        canonical::digest(&self.sealing_view())
    }

    /// Whether the stored hash matches the recomputed digest.
    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Fingerprint submitted to an external anchoring service.
    pub fn fingerprint(&self) -> String {
        canonical::fingerprint(self)
    }

    /// Check if this is the genesis record.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == ZERO_HASH
    }

    /// Check if an acknowledgment has been attached.
    pub fn is_anchored(&self) -> bool {
        self.onchain.is_some()
    }
}

/// Current time in seconds since the Unix epoch, at millisecond precision.
pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64 / 1000.0)
        .unwrap_or_default()
}

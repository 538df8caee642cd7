//! Chain validation rules.
//!
//! Validation recomputes every digest and link from the stored fields, so it
//! never trusts the storage medium. Detecting tampering is an expected
//! outcome, so results come back as a [`Verdict`] rather than an `Err`.

use recipechain_core::Record;
use thiserror::Error;

/// Why a chain or record failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainFault {
    #[error("hash mismatch at record {index}")]
    HashMismatch { index: usize },

    #[error("previous hash mismatch between records {previous} and {index}")]
    LinkageMismatch { previous: usize, index: usize },

    #[error("record {index} not found")]
    NotFound { index: usize },

    #[error("record hash tampered at record {index}")]
    RecordTampered { index: usize },
}

impl ChainFault {
    /// Index of the first offending record.
    pub fn index(&self) -> usize {
        match self {
            Self::HashMismatch { index }
            | Self::LinkageMismatch { index, .. }
            | Self::NotFound { index }
            | Self::RecordTampered { index } => *index,
        }
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the checked records are intact.
    pub valid: bool,
    /// Human-readable detail naming the offending index and mismatch kind.
    pub message: String,
    /// Structured failure reason, if any.
    pub fault: Option<ChainFault>,
}

impl Verdict {
    /// A passing verdict.
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
            fault: None,
        }
    }

    /// A failing verdict for the given fault.
    pub fn invalid(fault: ChainFault) -> Self {
        Self {
            valid: false,
            message: fault.to_string(),
            fault: Some(fault),
        }
    }
}

/// Chain validator.
pub struct ChainValidator;

impl ChainValidator {
    /// Validate every digest and link, in increasing index order.
    ///
    /// Stops at the first failure.
    pub fn validate_all(records: &[Record]) -> Verdict {
        for (i, record) in records.iter().enumerate() {
            if !record.verify_hash() {
                return Verdict::invalid(ChainFault::HashMismatch { index: i });
            }
            if i == 0 {
                continue;
            }
            if record.previous_hash != records[i - 1].hash {
                return Verdict::invalid(ChainFault::LinkageMismatch {
                    previous: i - 1,
                    index: i,
                });
            }
        }
        Verdict::valid("chain is valid")
    }

    /// Validate a single record's own digest, then the whole chain.
    ///
    /// A passing result certifies the record and every link in the chain.
    pub fn validate_one(records: &[Record], index: usize) -> Verdict {
        let Some(record) = records.get(index) else {
            return Verdict::invalid(ChainFault::NotFound { index });
        };
        if !record.verify_hash() {
            return Verdict::invalid(ChainFault::RecordTampered { index });
        }
        Self::validate_all(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::{Miner, PowConfig};
    use recipechain_core::{PendingRecord, RecipeDraft};

    fn build_chain(len: usize) -> Vec<Record> {
        let miner = Miner::new(&PowConfig::new(1));
        let mut records = vec![miner.mine(PendingRecord::genesis()).unwrap()];
        for i in 1..len {
            let draft = RecipeDraft::new(
                format!("Recipe {}", i),
                vec!["flour".into()],
                vec!["Bake".into()],
                "tester",
            );
            let tail = &records[i - 1];
            let pending = PendingRecord::new(i as u64, tail.hash.clone(), draft);
            records.push(miner.mine(pending).unwrap());
        }
        records
    }

    /// Recompute a record's hash after editing it, without any proof of work.
    fn reseal(record: &mut Record) {
        record.hash = record.compute_hash();
    }

    #[test]
    fn test_fresh_chain_valid() {
        let records = build_chain(4);
        let verdict = ChainValidator::validate_all(&records);
        assert!(verdict.valid);
        assert_eq!(verdict.message, "chain is valid");
        assert!(verdict.fault.is_none());
    }

    #[test]
    fn test_tampered_field_detected() {
        let mut records = build_chain(4);
        records[2].title = "Forged".into();

        let verdict = ChainValidator::validate_all(&records);
        assert!(!verdict.valid);
        assert_eq!(verdict.fault, Some(ChainFault::HashMismatch { index: 2 }));
        assert!(verdict.message.contains("hash mismatch"));

        assert!(ChainValidator::validate_all(&records[..2]).valid);
    }

    #[test]
    fn test_broken_link_detected() {
        let mut records = build_chain(4);
        records[2].previous_hash = "f".repeat(64);
        reseal(&mut records[2]);

        let verdict = ChainValidator::validate_all(&records);
        assert_eq!(
            verdict.fault,
            Some(ChainFault::LinkageMismatch {
                previous: 1,
                index: 2
            })
        );
        assert!(verdict.message.contains("previous hash mismatch"));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut records = build_chain(4);
        records[1].creator = "mallory".into();
        records[3].title = "Forged".into();

        let verdict = ChainValidator::validate_all(&records);
        assert_eq!(verdict.fault.unwrap().index(), 1);
    }

    #[test]
    fn test_validate_one_not_found() {
        let records = build_chain(2);
        let verdict = ChainValidator::validate_one(&records, 5);
        assert!(!verdict.valid);
        assert_eq!(verdict.fault, Some(ChainFault::NotFound { index: 5 }));
        assert!(verdict.message.contains("not found"));
    }

    #[test]
    fn test_validate_one_own_digest() {
        let mut records = build_chain(3);
        records[1].steps.push("Serve".into());

        let verdict = ChainValidator::validate_one(&records, 1);
        assert_eq!(verdict.fault, Some(ChainFault::RecordTampered { index: 1 }));
    }

    #[test]
    fn test_validate_one_checks_whole_chain() {
        let mut records = build_chain(4);
        records[3].title = "Forged".into();

        // Record 1 is intact, but the chain it belongs to is not.
        let verdict = ChainValidator::validate_one(&records, 1);
        assert!(!verdict.valid);
        assert_eq!(verdict.fault, Some(ChainFault::HashMismatch { index: 3 }));
    }

    #[test]
    fn test_relinked_record_passes_own_check_only() {
        let mut records = build_chain(3);
        records[2].previous_hash = "a".repeat(64);
        reseal(&mut records[2]);

        assert!(records[2].verify_hash());
        let verdict = ChainValidator::validate_one(&records, 2);
        assert_eq!(
            verdict.fault,
            Some(ChainFault::LinkageMismatch {
                previous: 1,
                index: 2
            })
        );
    }

    #[test]
    fn test_empty_sequence_is_vacuously_valid() {
        assert!(ChainValidator::validate_all(&[]).valid);
    }
}

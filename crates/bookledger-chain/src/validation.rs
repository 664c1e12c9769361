use chrono::DateTime;
use serde::Serialize;

use crate::block::Block;
use crate::error::{ChainError, Rejection};

/// Check that `candidate` may extend `tail`.
///
/// Checks run in order and stop at the first failure: lineage, recomputed
/// hash, then position.
pub fn validate_block(candidate: &Block, tail: &Block) -> Result<(), ChainError> {
    if candidate.previous_hash != tail.hash {
        return Err(Rejection::LineageMismatch {
            position: candidate.position,
            expected: tail.hash.clone(),
            found: candidate.previous_hash.clone(),
        }
        .into());
    }

    let computed = candidate.compute_hash()?;
    if computed != candidate.hash {
        return Err(Rejection::HashMismatch {
            position: candidate.position,
            stored: candidate.hash.clone(),
            computed,
        }
        .into());
    }

    if tail.position.checked_add(1) != Some(candidate.position) {
        return Err(Rejection::PositionMismatch {
            expected: tail.position.saturating_add(1),
            found: candidate.position,
        }
        .into());
    }

    Ok(())
}

/// Boolean form of [`validate_block`].
pub fn is_valid_block(candidate: &Block, tail: &Block) -> bool {
    validate_block(candidate, tail).is_ok()
}

/// Result of whole-chain validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub block_count: u64,
    pub genesis_valid: bool,
    pub lineage_valid: bool,
    pub hashes_valid: bool,
    pub positions_valid: bool,
    /// Informational only: regressions are tolerated, never a violation.
    pub timestamps_monotonic: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub position: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    GenesisInvalid,
    GenesisFlagMisplaced,
    LineageBreak,
    HashMismatch,
    PositionGap,
}

/// Whole-chain integrity validator.
pub struct ChainValidator;

impl ChainValidator {
    /// Walk every block and collect all violations.
    pub fn validate(blocks: &[Block]) -> Result<ValidationReport, ChainError> {
        let mut violations = Vec::new();
        let mut genesis_valid = true;
        let mut lineage_valid = true;
        let mut hashes_valid = true;
        let mut positions_valid = true;
        let mut timestamps_monotonic = true;

        match blocks.first() {
            Some(genesis) if genesis.is_genesis() => {}
            Some(genesis) => {
                genesis_valid = false;
                violations.push(Violation {
                    position: genesis.position,
                    kind: ViolationKind::GenesisInvalid,
                    description: "first block is not a genesis block".into(),
                });
            }
            None => {
                genesis_valid = false;
                violations.push(Violation {
                    position: 0,
                    kind: ViolationKind::GenesisInvalid,
                    description: "chain is empty".into(),
                });
            }
        }

        for (index, block) in blocks.iter().enumerate() {
            let expected_position = index as u64;
            if block.position != expected_position {
                positions_valid = false;
                violations.push(Violation {
                    position: block.position,
                    kind: ViolationKind::PositionGap,
                    description: format!(
                        "expected position {expected_position}, got {}",
                        block.position
                    ),
                });
            }

            if index > 0 {
                let prev = &blocks[index - 1];
                if block.previous_hash != prev.hash {
                    lineage_valid = false;
                    violations.push(Violation {
                        position: block.position,
                        kind: ViolationKind::LineageBreak,
                        description: "previous hash link mismatch".into(),
                    });
                }
                if block.data.is_genesis {
                    violations.push(Violation {
                        position: block.position,
                        kind: ViolationKind::GenesisFlagMisplaced,
                        description: "genesis flag set on a non-genesis block".into(),
                    });
                }
                if timestamp_regresses(&prev.timestamp, &block.timestamp) {
                    timestamps_monotonic = false;
                }
            }

            if !block.has_valid_hash()? {
                hashes_valid = false;
                violations.push(Violation {
                    position: block.position,
                    kind: ViolationKind::HashMismatch,
                    description: "block hash does not match computed".into(),
                });
            }
        }

        Ok(ValidationReport {
            block_count: blocks.len() as u64,
            genesis_valid,
            lineage_valid,
            hashes_valid,
            positions_valid,
            timestamps_monotonic,
            violations,
        })
    }

    /// Same rules as [`ChainValidator::validate`], reported as an error
    /// carrying the first violation found.
    pub fn verify(blocks: &[Block]) -> Result<(), ChainError> {
        let report = Self::validate(blocks)?;
        match report.violations.into_iter().next() {
            None => Ok(()),
            Some(v) if v.kind == ViolationKind::GenesisInvalid => {
                Err(ChainError::GenesisInvalid(v.description))
            }
            Some(v) => Err(ChainError::IntegrityViolation {
                position: v.position,
                reason: v.description,
            }),
        }
    }
}

/// Unparseable timestamps are not treated as regressions.
pub(crate) fn timestamp_regresses(prev: &str, next: &str) -> bool {
    match (DateTime::parse_from_rfc3339(prev), DateTime::parse_from_rfc3339(next)) {
        (Ok(p), Ok(n)) => n < p,
        _ => false,
    }
}

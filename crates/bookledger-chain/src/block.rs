use bookledger_crypto::BlockHasher;
use bookledger_types::CheckoutRecord;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// One entry of the ledger, committing a checkout and linking to its
/// predecessor by hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 0 for genesis, then exactly predecessor + 1.
    pub position: u64,
    /// RFC 3339 UTC construction time, second precision.
    pub timestamp: String,
    /// The committed checkout.
    pub data: CheckoutRecord,
    /// Hash of the preceding block. Empty for genesis.
    pub previous_hash: String,
    /// Lowercase hex BLAKE3 digest over the four fields above.
    pub hash: String,
}

/// What a new block extends.
#[derive(Clone, Copy, Debug)]
pub enum Predecessor<'a> {
    /// The synthetic zero block that sits before genesis.
    Sentinel,
    /// An existing block.
    Block(&'a Block),
}

impl Predecessor<'_> {
    fn next_position(&self) -> Result<u64, ChainError> {
        match self {
            Self::Sentinel => Ok(0),
            Self::Block(b) => b.position.checked_add(1).ok_or_else(|| {
                ChainError::IntegrityViolation {
                    position: b.position,
                    reason: "position overflow".into(),
                }
            }),
        }
    }

    fn hash(&self) -> &str {
        match self {
            Self::Sentinel => "",
            Self::Block(b) => &b.hash,
        }
    }
}

/// Current wall-clock time in the block timestamp format.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Block {
    /// Build the block that extends `predecessor`, stamped with the current time.
    pub fn create(predecessor: &Block, data: CheckoutRecord) -> Result<Self, ChainError> {
        Self::build(Predecessor::Block(predecessor), data, now_timestamp())
    }

    /// Same as [`Block::create`] with an explicit timestamp.
    pub fn create_at(
        predecessor: &Block,
        data: CheckoutRecord,
        timestamp: impl Into<String>,
    ) -> Result<Self, ChainError> {
        Self::build(Predecessor::Block(predecessor), data, timestamp.into())
    }

    /// The bootstrap block: position 0, empty previous hash, genesis payload.
    pub fn genesis() -> Result<Self, ChainError> {
        Self::build(Predecessor::Sentinel, CheckoutRecord::genesis(), now_timestamp())
    }

    /// Genesis with an explicit timestamp.
    pub fn genesis_at(timestamp: impl Into<String>) -> Result<Self, ChainError> {
        Self::build(Predecessor::Sentinel, CheckoutRecord::genesis(), timestamp.into())
    }

    /// Derive and seal a block from its predecessor.
    pub fn build(
        predecessor: Predecessor<'_>,
        data: CheckoutRecord,
        timestamp: String,
    ) -> Result<Self, ChainError> {
        let position = predecessor.next_position()?;
        let previous_hash = predecessor.hash().to_owned();
        let hash = BlockHasher::BLOCK.digest_record(position, &timestamp, &data, &previous_hash)?;
        Ok(Self {
            position,
            timestamp,
            data,
            previous_hash,
            hash,
        })
    }

    /// Hash recomputed from this block's own fields. Never trusts `self.hash`.
    pub fn compute_hash(&self) -> Result<String, ChainError> {
        Ok(BlockHasher::BLOCK.digest_record(
            self.position,
            &self.timestamp,
            &self.data,
            &self.previous_hash,
        )?)
    }

    /// Returns `true` if the stored hash matches a fresh recomputation.
    pub fn has_valid_hash(&self) -> Result<bool, ChainError> {
        let payload = BlockHasher::encode_payload(&self.data)?;
        Ok(BlockHasher::BLOCK.verify(
            self.position,
            &self.timestamp,
            &payload,
            &self.previous_hash,
            &self.hash,
        ))
    }

    /// Returns `true` for the position-0 bootstrap block.
    pub fn is_genesis(&self) -> bool {
        self.position == 0 && self.previous_hash.is_empty() && self.data.is_genesis
    }

    /// Short hex form of the hash, for logs.
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(8)]
    }
}

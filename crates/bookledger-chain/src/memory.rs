use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bookledger_types::CheckoutRecord;
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::error::ChainError;
use crate::traits::{ChainReader, ChainWriter};
use crate::validation::{timestamp_regresses, validate_block, ChainValidator, ValidationReport};

/// The process-owned chain.
///
/// A single `RwLock` serializes writers across the whole read-tail, build,
/// validate, commit sequence; readers clone out under the read lock and so
/// always see a point-in-time view.
pub struct InMemoryChain {
    inner: RwLock<Vec<Block>>,
}

impl InMemoryChain {
    /// Bootstrap a chain holding exactly one genesis block.
    pub fn new() -> Result<Self, ChainError> {
        Self::with_genesis(Block::genesis()?)
    }

    /// Bootstrap from a pre-built genesis block.
    pub fn with_genesis(genesis: Block) -> Result<Self, ChainError> {
        ChainValidator::verify(std::slice::from_ref(&genesis)).map_err(|err| match err {
            ChainError::IntegrityViolation { reason, .. } => ChainError::GenesisInvalid(reason),
            other => other,
        })?;
        info!(hash = %genesis.short_hash(), "chain bootstrapped with genesis block");
        Ok(Self {
            inner: RwLock::new(vec![genesis]),
        })
    }

    /// Validate the whole chain as it stands now.
    pub fn validate(&self) -> Result<ValidationReport, ChainError> {
        let blocks = self.read()?;
        ChainValidator::validate(&blocks)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Block>>, ChainError> {
        self.inner.read().map_err(|_| ChainError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Block>>, ChainError> {
        self.inner.write().map_err(|_| ChainError::LockPoisoned)
    }

    fn tail_of(blocks: &[Block]) -> Result<&Block, ChainError> {
        blocks.last().ok_or_else(|| ChainError::IntegrityViolation {
            position: 0,
            reason: "chain has no genesis block".into(),
        })
    }

    /// Validate against the tail and push. The caller holds the write lock.
    fn commit(blocks: &mut Vec<Block>, candidate: Block) -> Result<Block, ChainError> {
        let tail = Self::tail_of(blocks)?;
        if let Err(err) = validate_block(&candidate, tail) {
            if let Some(rejection) = err.rejection() {
                warn!(
                    position = candidate.position,
                    reason = rejection.code(),
                    "candidate block rejected: {rejection}"
                );
            }
            return Err(err);
        }

        if timestamp_regresses(&tail.timestamp, &candidate.timestamp) {
            debug!(
                position = candidate.position,
                tail = %tail.timestamp,
                candidate = %candidate.timestamp,
                "accepting block with regressed timestamp"
            );
        }

        blocks.push(candidate.clone());
        info!(
            position = candidate.position,
            hash = %candidate.short_hash(),
            "block appended"
        );
        Ok(candidate)
    }
}

impl ChainWriter for InMemoryChain {
    fn append(&self, data: CheckoutRecord) -> Result<Block, ChainError> {
        let mut blocks = self.write()?;
        let candidate = Block::create(Self::tail_of(&blocks)?, data)?;
        Self::commit(&mut blocks, candidate)
    }

    fn submit(&self, candidate: Block) -> Result<Block, ChainError> {
        let mut blocks = self.write()?;
        Self::commit(&mut blocks, candidate)
    }
}

impl ChainReader for InMemoryChain {
    fn snapshot(&self) -> Result<Vec<Block>, ChainError> {
        Ok(self.read()?.clone())
    }

    fn tail(&self) -> Result<Block, ChainError> {
        let blocks = self.read()?;
        Self::tail_of(&blocks).cloned()
    }

    fn get(&self, position: u64) -> Result<Option<Block>, ChainError> {
        let blocks = self.read()?;
        let Ok(index) = usize::try_from(position) else {
            return Ok(None);
        };
        Ok(blocks.get(index).cloned())
    }

    fn block_count(&self) -> Result<u64, ChainError> {
        Ok(self.read()?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::error::Rejection;

    use super::*;

    const TS: &str = "2024-01-01T00:00:00Z";

    fn checkout(book: &str, user: &str) -> CheckoutRecord {
        CheckoutRecord::new(book, user, TS)
    }

    #[test]
    fn fresh_chain_holds_only_genesis() {
        let chain = InMemoryChain::new().unwrap();
        let blocks = chain.snapshot().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].position, 0);
        assert!(blocks[0].previous_hash.is_empty());
        assert!(blocks[0].data.is_genesis);
        assert_eq!(chain.tail().unwrap(), blocks[0]);
    }

    #[test]
    fn append_extends_tail() {
        let chain = InMemoryChain::new().unwrap();
        let genesis = chain.tail().unwrap();

        let block = chain.append(checkout("b1", "alice")).unwrap();
        assert_eq!(block.position, 1);
        assert_eq!(block.previous_hash, genesis.hash);
        assert_eq!(chain.tail().unwrap(), block);
        assert_eq!(chain.block_count().unwrap(), 2);
    }

    #[test]
    fn forged_lineage_is_rejected_and_chain_unchanged() {
        let chain = InMemoryChain::new().unwrap();
        chain.append(checkout("b1", "alice")).unwrap();
        let before = chain.snapshot().unwrap();

        let tail = chain.tail().unwrap();
        let mut forged = Block::create(&tail, checkout("b2", "bob")).unwrap();
        forged.previous_hash = "0000unrelated".into();
        forged.hash = forged.compute_hash().unwrap();

        let err = chain.submit(forged).unwrap_err();
        assert!(matches!(
            err,
            ChainError::Rejected(Rejection::LineageMismatch { position: 2, .. })
        ));
        assert_eq!(chain.block_count().unwrap(), 2);
        assert_eq!(chain.snapshot().unwrap(), before);
    }

    #[test]
    fn stale_candidate_is_rejected_after_tail_moves() {
        let chain = InMemoryChain::new().unwrap();
        let genesis = chain.tail().unwrap();
        let stale = Block::create(&genesis, checkout("b1", "alice")).unwrap();
        chain.append(checkout("b2", "bob")).unwrap();

        let err = chain.submit(stale).unwrap_err();
        assert_eq!(err.rejection().unwrap().code(), "lineage_mismatch");
        assert_eq!(chain.block_count().unwrap(), 2);
    }

    #[test]
    fn submit_accepts_well_formed_candidate() {
        let chain = InMemoryChain::new().unwrap();
        let candidate = Block::create(&chain.tail().unwrap(), checkout("b1", "alice")).unwrap();
        let committed = chain.submit(candidate.clone()).unwrap();
        assert_eq!(committed, candidate);
        assert_eq!(chain.tail().unwrap(), candidate);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let chain = InMemoryChain::new().unwrap();
        let mut snap = chain.snapshot().unwrap();
        snap.clear();
        assert_eq!(chain.block_count().unwrap(), 1);
    }

    #[test]
    fn get_by_position() {
        let chain = InMemoryChain::new().unwrap();
        let b1 = chain.append(checkout("b1", "alice")).unwrap();
        assert_eq!(chain.get(1).unwrap(), Some(b1));
        assert!(chain.get(0).unwrap().unwrap().is_genesis());
        assert_eq!(chain.get(9).unwrap(), None);
    }

    #[test]
    fn with_genesis_rejects_non_genesis() {
        let genesis = Block::genesis_at(TS).unwrap();
        let b1 = Block::create_at(&genesis, checkout("b1", "alice"), TS).unwrap();
        assert!(matches!(
            InMemoryChain::with_genesis(b1),
            Err(ChainError::GenesisInvalid(_))
        ));

        let mut tampered = genesis.clone();
        tampered.timestamp = "2030-01-01T00:00:00Z".into();
        assert!(matches!(
            InMemoryChain::with_genesis(tampered),
            Err(ChainError::GenesisInvalid(_))
        ));

        assert!(InMemoryChain::with_genesis(genesis).is_ok());
    }

    #[test]
    fn appended_chain_validates() {
        let chain = InMemoryChain::new().unwrap();
        for i in 0..10 {
            chain.append(checkout(&format!("b{i}"), "alice")).unwrap();
        }
        let report = chain.validate().unwrap();
        assert!(report.is_valid());
        assert_eq!(report.block_count, 11);
    }

    #[test]
    fn concurrent_appends_stay_gap_free() {
        let chain = Arc::new(InMemoryChain::new().unwrap());
        let writers = 8;
        let per_writer = 25;

        thread::scope(|s| {
            for w in 0..writers {
                let chain = Arc::clone(&chain);
                s.spawn(move || {
                    for i in 0..per_writer {
                        chain
                            .append(checkout(&format!("b{w}-{i}"), &format!("user{w}")))
                            .unwrap();
                    }
                });
            }
            let reader = Arc::clone(&chain);
            s.spawn(move || {
                for _ in 0..50 {
                    let snap = reader.snapshot().unwrap();
                    assert!(ChainValidator::verify(&snap).is_ok());
                }
            });
        });

        let blocks = chain.snapshot().unwrap();
        assert_eq!(blocks.len(), 1 + writers * per_writer);
        for (index, block) in blocks.iter().enumerate() {
            assert_eq!(block.position, index as u64);
        }
        assert!(ChainValidator::verify(&blocks).is_ok());
    }
}

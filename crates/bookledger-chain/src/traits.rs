use bookledger_types::CheckoutRecord;

use crate::block::Block;
use crate::error::ChainError;

/// Write boundary for chain append operations.
pub trait ChainWriter: Send + Sync {
    /// Build a block for `data` on the current tail, validate it, and commit it.
    fn append(&self, data: CheckoutRecord) -> Result<Block, ChainError>;

    /// Validate a caller-built block against the current tail and commit it.
    fn submit(&self, candidate: Block) -> Result<Block, ChainError>;
}

/// Read boundary for chain queries. Every read returns owned copies.
pub trait ChainReader: Send + Sync {
    fn snapshot(&self) -> Result<Vec<Block>, ChainError>;

    fn tail(&self) -> Result<Block, ChainError>;

    fn get(&self, position: u64) -> Result<Option<Block>, ChainError>;

    fn block_count(&self) -> Result<u64, ChainError>;
}

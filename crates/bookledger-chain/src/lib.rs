//! Append-only, hash-linked checkout chain.
//!
//! This crate is the heart of bookledger. It provides:
//! - The [`Block`] type with genesis bootstrap and hash-linked construction
//! - Candidate validation with classified [`Rejection`] reasons
//! - Whole-chain validation reports ([`ChainValidator`])
//! - `ChainWriter` / `ChainReader` trait boundaries
//! - [`InMemoryChain`], the process-owned chain behind a single-writer lock

pub mod block;
pub mod error;
pub mod memory;
pub mod traits;
pub mod validation;

pub use block::{now_timestamp, Block, Predecessor};
pub use error::{ChainError, Rejection};
pub use memory::InMemoryChain;
pub use traits::{ChainReader, ChainWriter};
pub use validation::{
    is_valid_block, validate_block, ChainValidator, ValidationReport, Violation, ViolationKind,
};

//! Cryptographic primitives for the book checkout ledger.
//!
//! Provides the domain-separated BLAKE3 block hasher.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::{BlockHasher, HasherError};

//! Foundation types for the book checkout ledger.
//!
//! Every other bookledger crate depends on `bookledger-types`.
//!
//! # Key Types
//!
//! - [`CheckoutRecord`] — The payload committed by each block
//! - [`Book`] — Catalogue entry with a server-derived identifier
//! - [`BookId`] — Content-derived book identifier (BLAKE3 over ISBN and publish date)

pub mod book;
pub mod checkout;
pub mod error;

pub use book::{Book, BookId};
pub use checkout::CheckoutRecord;
pub use error::TypeError;

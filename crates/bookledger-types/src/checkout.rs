use std::fmt;

use serde::{Deserialize, Serialize};

/// A single book checkout event, the payload committed by each block.
///
/// Field order is part of the canonical encoding: the block hasher consumes
/// the JSON form of this struct, so reordering fields changes every hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckoutRecord {
    /// Identifier of the book being checked out.
    pub book_id: String,
    /// The borrowing user.
    pub user: String,
    /// Checkout time as supplied by the caller. Not interpreted.
    pub checkout_date: String,
    /// Set only on the genesis block's payload.
    #[serde(default)]
    pub is_genesis: bool,
}

impl CheckoutRecord {
    /// A caller checkout. The genesis flag is always cleared.
    pub fn new(
        book_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// The synthetic payload carried by the genesis block.
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }
}

impl fmt::Display for CheckoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_genesis {
            write!(f, "genesis")
        } else {
            write!(f, "{} -> {} @ {}", self.book_id, self.user, self.checkout_date)
        }
    }
}

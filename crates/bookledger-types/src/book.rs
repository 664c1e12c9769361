use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const BOOK_DOMAIN: &[u8] = b"bookledger-book-v1:";

/// Content-derived identifier for a catalogue book.
///
/// Derived from the ISBN followed by the publish date, so registering the same
/// edition twice yields the same identifier. Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId([u8; 32]);

impl BookId {
    /// Derive the identifier for an edition.
    pub fn derive(isbn: &str, publish_date: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(BOOK_DOMAIN);
        hasher.update(isbn.as_bytes());
        hasher.update(publish_date.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for BookId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.to_hex()
    }
}

/// A catalogue entry.
///
/// `id` is always assigned by [`Book::register`]; any identifier the caller
/// supplied is discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_deserializing)]
    pub id: Option<BookId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub isbn: String,
}

impl Book {
    /// Assign the derived identifier. The ISBN is required.
    pub fn register(mut self) -> Result<Self, TypeError> {
        if self.isbn.trim().is_empty() {
            return Err(TypeError::MissingField("isbn"));
        }
        self.id = Some(BookId::derive(&self.isbn, &self.publish_date));
        Ok(self)
    }
}

use serde::Serialize;

/// Domain-separated BLAKE3 block hasher.
///
/// The digest input is, in order: the domain tag and `:`, the decimal
/// position, the timestamp string, the canonical payload bytes, and the
/// previous block's hash string. Each field after the tag is preceded by its
/// byte length as a little-endian `u64`, so no field boundary can shift.
/// Output is 64 lowercase hex characters.
pub struct BlockHasher {
    domain: &'static str,
}

impl BlockHasher {
    /// Hasher for ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "bookledger-block-v1",
    };

    /// Hash a block's fields.
    pub fn digest(
        &self,
        position: u64,
        timestamp: &str,
        payload: &[u8],
        previous_hash: &str,
    ) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        let position = position.to_string();
        for field in [
            position.as_bytes(),
            timestamp.as_bytes(),
            payload,
            previous_hash.as_bytes(),
        ] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    /// Encode the payload canonically and hash the block's fields.
    pub fn digest_record<T: Serialize>(
        &self,
        position: u64,
        timestamp: &str,
        payload: &T,
        previous_hash: &str,
    ) -> Result<String, HasherError> {
        let encoded = Self::encode_payload(payload)?;
        Ok(self.digest(position, timestamp, &encoded, previous_hash))
    }

    /// Check a stored hash against the recomputed one.
    pub fn verify(
        &self,
        position: u64,
        timestamp: &str,
        payload: &[u8],
        previous_hash: &str,
        expected: &str,
    ) -> bool {
        self.digest(position, timestamp, payload, previous_hash) == expected
    }

    /// Canonical payload encoding (compact JSON, declaration field order).
    pub fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>, HasherError> {
        serde_json::to_vec(payload).map_err(|e| HasherError::Serialization(e.to_string()))
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

use bookledger_crypto::HasherError;

/// Why a candidate block was refused. All variants are caller-correctable:
/// the candidate is dropped, the chain is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("lineage mismatch at position {position}: previous hash {found} does not extend tail {expected}")]
    LineageMismatch {
        position: u64,
        expected: String,
        found: String,
    },

    #[error("hash mismatch at position {position}: stored {stored}, computed {computed}")]
    HashMismatch {
        position: u64,
        stored: String,
        computed: String,
    },

    #[error("position mismatch: expected {expected}, found {found}")]
    PositionMismatch { expected: u64, found: u64 },
}

impl Rejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LineageMismatch { .. } => "lineage_mismatch",
            Self::HashMismatch { .. } => "hash_mismatch",
            Self::PositionMismatch { .. } => "position_mismatch",
        }
    }
}

/// Errors produced by chain operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("block rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("integrity violation at position {position}: {reason}")]
    IntegrityViolation { position: u64, reason: String },

    #[error("invalid genesis block: {0}")]
    GenesisInvalid(String),

    #[error("chain lock poisoned")]
    LockPoisoned,
}

impl ChainError {
    /// Returns `true` for caller-correctable rejections.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection reason, if this is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

impl From<HasherError> for ChainError {
    fn from(err: HasherError) -> Self {
        match err {
            HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}

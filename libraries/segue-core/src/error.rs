/// Core error types for Segue
use thiserror::Error;

/// Result type alias using `SegueError`
pub type Result<T> = std::result::Result<T, SegueError>;

/// Coarse classification of a failure, used by the reconciler to decide how
/// loudly to log and whether the next sweep can be expected to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Timeout, 5xx, rate limit or an unreachable upstream. Retried next sweep.
    Transient,
    /// Missing, expired or undecryptable credentials.
    Auth,
    /// Anything else (malformed responses, invalid input, ...).
    Other,
}

/// Core error type for Segue
#[derive(Error, Debug)]
pub enum SegueError {
    /// An upstream call failed in a way that is expected to heal by itself
    #[error("Upstream unavailable: {0}")]
    Transient(String),

    /// An upstream call did not answer within its budget
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Credentials were rejected or could not be used
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A sealed token could not be opened
    #[error("Token decryption failed: {0}")]
    Decryption(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The upstream answered with something we could not understand
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Storage errors (for store implementations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SegueError {
    /// Create a transient upstream error
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transient(_) | Self::Timeout(_) | Self::Storage(_) => ErrorKind::Transient,
            Self::Auth(_) | Self::Decryption(_) => ErrorKind::Auth,
            Self::NotFound { .. }
            | Self::Duplicate(_)
            | Self::InvalidInput(_)
            | Self::InvalidResponse(_)
            | Self::Serialization(_)
            | Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether the next sweep can be expected to succeed without intervention.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

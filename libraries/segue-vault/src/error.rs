//! Error types for token encryption.

use thiserror::Error;

/// Errors raised while sealing or opening tokens.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Key is not valid base64 or has the wrong length
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    /// Sealed value is not valid base64
    #[error("Malformed sealed token: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Sealed value is too short to contain a nonce
    #[error("Sealed token is truncated")]
    Truncated,

    /// Encryption failed, or decryption failed authentication (wrong key or tampered)
    #[error("Cipher operation failed")]
    Crypto,

    /// Decrypted bytes are not UTF-8
    #[error("Decrypted token is not valid UTF-8")]
    Utf8,
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

impl From<VaultError> for segue_core::SegueError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::InvalidKey(msg) => segue_core::SegueError::invalid_input(msg),
            other => segue_core::SegueError::Decryption(other.to_string()),
        }
    }
}

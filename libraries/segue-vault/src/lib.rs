//! Segue Vault
//!
//! AES-256-GCM encryption of playback service tokens at rest.
//!
//! The store seals tokens before writing them; the queue manager opens them
//! right before talking to the playback service. Both sides share one
//! base64-encoded 32 byte key.
//!
//! # Example
//!
//! ```rust
//! use segue_core::{AccessToken, TokenCipher};
//! use segue_vault::{generate_key, AesGcmTokenCipher};
//!
//! let cipher = AesGcmTokenCipher::from_base64_key(&generate_key()).unwrap();
//! let sealed = cipher.seal(&AccessToken::new("BQD...")).unwrap();
//! assert_eq!(cipher.open(&sealed).unwrap().secret(), "BQD...");
//! ```

#![forbid(unsafe_code)]

mod cipher;
mod error;

pub use cipher::{generate_key, AesGcmTokenCipher, KEY_LEN, NONCE_LEN};
pub use error::{Result, VaultError};

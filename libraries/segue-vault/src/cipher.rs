//! AES-256-GCM token cipher.

use crate::error::{Result, VaultError};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use segue_core::{AccessToken, SealedToken, TokenCipher};

/// Key length in bytes.
pub const KEY_LEN: usize = 32;
/// Nonce length in bytes, prepended to every ciphertext.
pub const NONCE_LEN: usize = 12;

/// Generate a fresh random key, base64 encoded.
pub fn generate_key() -> String {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    BASE64.encode(key)
}

/// Seals tokens as `base64(nonce || ciphertext)` with a random nonce per token.
#[derive(Clone)]
pub struct AesGcmTokenCipher {
    cipher: Aes256Gcm,
}

impl AesGcmTokenCipher {
    /// Build a cipher from a base64-encoded 32 byte key.
    pub fn from_base64_key(encoded: &str) -> Result<Self> {
        let key = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|e| VaultError::InvalidKey(e.to_string()))?;
        if key.len() != KEY_LEN {
            return Err(VaultError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        let cipher =
            Aes256Gcm::new_from_slice(&key).map_err(|e| VaultError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    pub fn seal_str(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::Crypto)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    pub fn open_str(&self, sealed: &str) -> Result<String> {
        let raw = BASE64.decode(sealed.trim().as_bytes())?;
        if raw.len() <= NONCE_LEN {
            return Err(VaultError::Truncated);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| VaultError::Crypto)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::Utf8)
    }
}

impl TokenCipher for AesGcmTokenCipher {
    fn seal(&self, token: &AccessToken) -> segue_core::Result<SealedToken> {
        Ok(SealedToken::new(self.seal_str(token.secret())?))
    }

    fn open(&self, sealed: &SealedToken) -> segue_core::Result<AccessToken> {
        Ok(AccessToken::new(self.open_str(sealed.as_str())?))
    }
}

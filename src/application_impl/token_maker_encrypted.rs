use crate::application_port::TokenMaker;
use crate::domain_model::{Payload, TokenError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chacha20poly1305::{aead::Aead, aead::KeyInit, ChaCha20Poly1305, Key, Nonce};
use chrono::{Duration, Utc};
use rand::RngCore;

pub const AEAD_KEY_BYTES: usize = 32;
const NONCE_BYTES: usize = 12;

/// Encrypted-token maker: the payload travels as one opaque
/// `base64url(nonce || ciphertext)` blob, sealed with ChaCha20-Poly1305.
/// Nothing about the claims is inspectable without the key.
pub struct EncryptedTokenMaker {
    cipher: ChaCha20Poly1305,
}

impl EncryptedTokenMaker {
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != AEAD_KEY_BYTES {
            return Err(TokenError::WeakKey(AEAD_KEY_BYTES));
        }
        Ok(EncryptedTokenMaker {
            cipher: ChaCha20Poly1305::new(Key::from_slice(key)),
        })
    }
}

impl TokenMaker for EncryptedTokenMaker {
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, duration)?;
        let plaintext =
            serde_json::to_vec(&payload).map_err(|e| TokenError::Internal(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_slice())
            .map_err(|_| TokenError::Internal("encryption failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_BYTES + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);

        Ok((URL_SAFE_NO_PAD.encode(blob), payload))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let blob = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Malformed)?;
        if blob.len() <= NONCE_BYTES {
            return Err(TokenError::Malformed);
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_BYTES);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| TokenError::Decryption)?;

        let payload: Payload =
            serde_json::from_slice(&plaintext).map_err(|_| TokenError::Malformed)?;

        if payload.is_expired(Utc::now()) {
            return Err(TokenError::Expired);
        }
        Ok(payload)
    }
}

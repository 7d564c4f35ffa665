//! Symmetric encryption for user-supplied provider API keys.
//!
//! Every secret is encrypted at rest with AES-256-GCM under a single
//! process-wide key loaded once at startup. Stored ciphertext is
//! `base64(nonce || ciphertext)` so a plain TEXT column holds it. The
//! plaintext key is never persisted or logged; clients only ever see the
//! masked form produced by [`mask_secret`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

/// Key length in bytes (256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// Nonce length in bytes (96 bits for AES-GCM).
const NONCE_LENGTH: usize = 12;

/// Number of trailing plaintext characters left visible by [`mask_secret`].
pub const DEFAULT_VISIBLE_TAIL: usize = 4;

/// Placeholder substituted when a secret cannot be displayed at all
/// (empty, too short, or failed to decrypt).
pub const MASK_PLACEHOLDER: &str = "***";

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Refusing to encrypt an empty secret.
    #[error("cannot encrypt an empty secret")]
    EmptyPlaintext,

    /// Ciphertext is empty, malformed, truncated, or was produced under a
    /// different key. Callers in list paths must recover per-item by
    /// substituting [`MASK_PLACEHOLDER`], never abort the whole response.
    #[error("failed to decrypt secret: {0}")]
    DecryptionFailure(&'static str),

    /// The configured key material is not a valid 32-byte hex or base64 value.
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),
}

/// Process-wide secret vault, constructed once at startup and injected
/// wherever encryption or decryption is needed.
pub struct SecretVault {
    cipher: Aes256Gcm,
}

impl SecretVault {
    /// Build a vault from raw 32-byte key material.
    pub fn new(key: &[u8; KEY_LENGTH]) -> Self {
        let cipher = Aes256Gcm::new_from_slice(key).expect("key length is fixed at 32 bytes");
        Self { cipher }
    }

    /// Build a vault from a hex- or base64-encoded key string, as supplied via
    /// the `API_KEY_ENCRYPTION_KEY` environment variable.
    pub fn from_key_material(key_str: &str) -> Result<Self, VaultError> {
        let key = parse_key(key_str)?;
        Ok(Self::new(&key))
    }

    /// Encrypt a plaintext secret. Returns `base64(nonce || ciphertext)` with
    /// a fresh random nonce, so encrypting the same secret twice produces
    /// different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        if plaintext.is_empty() {
            return Err(VaultError::EmptyPlaintext);
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::DecryptionFailure("encryption failed"))?;

        let mut combined = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(&combined))
    }

    /// Decrypt a stored ciphertext back to the plaintext secret.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError> {
        if ciphertext.is_empty() {
            return Err(VaultError::DecryptionFailure("empty ciphertext"));
        }

        let combined = BASE64
            .decode(ciphertext)
            .map_err(|_| VaultError::DecryptionFailure("not valid base64"))?;

        if combined.len() <= NONCE_LENGTH {
            return Err(VaultError::DecryptionFailure("ciphertext too short"));
        }

        let (nonce_bytes, payload) = combined.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, payload)
            .map_err(|_| VaultError::DecryptionFailure("wrong key or corrupted data"))?;

        String::from_utf8(plaintext)
            .map_err(|_| VaultError::DecryptionFailure("plaintext is not valid UTF-8"))
    }
}

impl std::fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material through Debug.
        f.write_str("SecretVault")
    }
}

/// Mask a plaintext secret for display.
///
/// Shows the last `visible_tail` characters behind a run of `*`s matching the
/// hidden length. Secrets that are empty or no longer than `visible_tail`
/// collapse to [`MASK_PLACEHOLDER`]. Pure function, no side effects.
pub fn mask_secret(plaintext: &str, visible_tail: usize) -> String {
    let chars: Vec<char> = plaintext.chars().collect();
    if chars.is_empty() || chars.len() <= visible_tail {
        return MASK_PLACEHOLDER.to_string();
    }
    let hidden = chars.len() - visible_tail;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

/// Parse key material from a 64-char hex string or base64, in that order.
fn parse_key(key_str: &str) -> Result<[u8; KEY_LENGTH], VaultError> {
    let trimmed = key_str.trim();
    if trimmed.is_empty() {
        return Err(VaultError::InvalidKey("key is empty".into()));
    }

    if trimmed.len() == KEY_LENGTH * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut key = [0u8; KEY_LENGTH];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&trimmed[i * 2..i * 2 + 2], 16)
                .map_err(|_| VaultError::InvalidKey("invalid hex".into()))?;
        }
        return Ok(key);
    }

    let bytes = BASE64
        .decode(trimmed)
        .map_err(|_| VaultError::InvalidKey("key is neither valid hex nor base64".into()))?;
    if bytes.len() != KEY_LENGTH {
        return Err(VaultError::InvalidKey(format!(
            "key must be {KEY_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }

    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&bytes);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vault() -> SecretVault {
        let mut key = [0u8; KEY_LENGTH];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        SecretVault::new(&key)
    }

    // -- Round trip --------------------------------------------------------

    #[test]
    fn encrypt_decrypt_round_trip() {
        let vault = test_vault();
        for secret in ["sk-abc123", "x", "Hello, 世界! 🎉", "a very long key ".repeat(40).as_str()] {
            let ciphertext = vault.encrypt(secret).expect("encrypt should succeed");
            assert_ne!(ciphertext, secret);
            let plaintext = vault.decrypt(&ciphertext).expect("decrypt should succeed");
            assert_eq!(plaintext, secret);
        }
    }

    #[test]
    fn encrypting_twice_differs_but_decrypts_identically() {
        let vault = test_vault();
        let a = vault.encrypt("same-secret").unwrap();
        let b = vault.encrypt("same-secret").unwrap();
        // Random nonces mean distinct ciphertexts.
        assert_ne!(a, b);
        assert_eq!(vault.decrypt(&a).unwrap(), "same-secret");
        assert_eq!(vault.decrypt(&b).unwrap(), "same-secret");
    }

    #[test]
    fn empty_plaintext_is_rejected() {
        let vault = test_vault();
        assert!(matches!(
            vault.encrypt(""),
            Err(VaultError::EmptyPlaintext)
        ));
    }

    // -- Decryption failures -----------------------------------------------

    #[test]
    fn empty_ciphertext_fails() {
        let vault = test_vault();
        assert!(matches!(
            vault.decrypt(""),
            Err(VaultError::DecryptionFailure(_))
        ));
    }

    #[test]
    fn malformed_ciphertext_fails() {
        let vault = test_vault();
        assert!(vault.decrypt("not base64 at all!!!").is_err());
        assert!(vault.decrypt("YWJj").is_err(), "too short to hold a nonce");
    }

    #[test]
    fn wrong_key_fails() {
        let vault_a = test_vault();
        let mut other_key = [0u8; KEY_LENGTH];
        other_key[0] = 255;
        let vault_b = SecretVault::new(&other_key);

        let ciphertext = vault_a.encrypt("secret").unwrap();
        assert!(matches!(
            vault_b.decrypt(&ciphertext),
            Err(VaultError::DecryptionFailure(_))
        ));
    }

    // -- Masking -----------------------------------------------------------

    #[test]
    fn mask_shows_tail_only() {
        assert_eq!(mask_secret("abcd1234", 4), "****1234");
        assert_eq!(mask_secret("sk-proj-abcdef", 4), "**********cdef");
    }

    #[test]
    fn mask_collapses_short_or_empty() {
        assert_eq!(mask_secret("abc", 4), "***");
        assert_eq!(mask_secret("abcd", 4), "***");
        assert_eq!(mask_secret("", 4), "***");
    }

    #[test]
    fn mask_counts_characters_not_bytes() {
        assert_eq!(mask_secret("日本語キー123", 3), "*****123");
    }

    // -- Key parsing -------------------------------------------------------

    #[test]
    fn parse_hex_key() {
        let hex = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
        let key = parse_key(hex).unwrap();
        for (i, byte) in key.iter().enumerate() {
            assert_eq!(*byte, i as u8);
        }
    }

    #[test]
    fn parse_base64_key() {
        let raw = [7u8; KEY_LENGTH];
        let encoded = BASE64.encode(raw);
        assert_eq!(parse_key(&encoded).unwrap(), raw);
    }

    #[test]
    fn parse_key_rejects_bad_material() {
        assert!(parse_key("").is_err());
        assert!(parse_key("abc").is_err());
        assert!(parse_key(&BASE64.encode([1u8; 16])).is_err(), "wrong length");
    }
}

// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symmetric codec for device secrets.
//!
//! A sealed secret is a pair of URL-safe base64 strings: the ciphertext token
//! and the salt. The token layout is
//!
//! ```text
//! version (1) | iterations (u32 BE) | nonce (12) | ciphertext + tag
//! ```
//!
//! The 5-byte header is bound as AES-GCM associated data, so the recorded
//! iteration count cannot be altered without failing authentication.

use std::num::NonZeroU32;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use netapi_core::NetApiError;
use ring::aead::NONCE_LEN;
use secrecy::{ExposeSecret, SecretString};

use crate::{crypto, kdf};

/// Token format version written by [`SecretCodec::encrypt`].
pub const FORMAT_VERSION: u8 = 0x01;

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Fewest PBKDF2 iterations accepted on encrypt or decrypt.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Most PBKDF2 iterations accepted on decrypt. Caps the work an attacker-
/// supplied token can force.
pub const MAX_ITERATIONS: u32 = 10_000_000;

const HEADER_LEN: usize = 5;

const DEFAULT_ITERATIONS_NZ: NonZeroU32 = match NonZeroU32::new(DEFAULT_ITERATIONS) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// Output of [`SecretCodec::encrypt`], ready to store in a device record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: String,
    pub salt: String,
}

/// Encrypts and decrypts device secrets under a master passphrase.
pub struct SecretCodec {
    master: SecretString,
    iterations: NonZeroU32,
}

impl SecretCodec {
    /// Codec using [`DEFAULT_ITERATIONS`] for new secrets.
    pub fn new(master: SecretString) -> Self {
        Self {
            master,
            iterations: DEFAULT_ITERATIONS_NZ,
        }
    }

    /// Override the iteration count used for new secrets.
    ///
    /// Decryption always uses the count recorded in each token.
    pub fn with_iterations(mut self, iterations: u32) -> Result<Self, NetApiError> {
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
            return Err(NetApiError::Vault(format!(
                "kdf iterations must be within {MIN_ITERATIONS}..={MAX_ITERATIONS}, got {iterations}"
            )));
        }
        self.iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| NetApiError::Vault("kdf iterations must be non-zero".to_string()))?;
        Ok(self)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Seal `plaintext` under a fresh salt and nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<SealedSecret, NetApiError> {
        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(self.master.expose_secret().as_bytes(), &salt, self.iterations);

        let mut header = [0u8; HEADER_LEN];
        header[0] = FORMAT_VERSION;
        header[1..].copy_from_slice(&self.iterations.get().to_be_bytes());

        let (sealed, nonce) = crypto::seal(&key, &header, plaintext.as_bytes())?;

        let mut token = Vec::with_capacity(HEADER_LEN + NONCE_LEN + sealed.len());
        token.extend_from_slice(&header);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&sealed);

        Ok(SealedSecret {
            ciphertext: URL_SAFE.encode(token),
            salt: URL_SAFE.encode(salt),
        })
    }

    /// Recover the plaintext sealed by [`encrypt`](Self::encrypt).
    ///
    /// Every failure is reported as [`NetApiError::DecryptFailed`] with no
    /// further detail.
    pub fn decrypt(&self, ciphertext: &str, salt: &str) -> Result<SecretString, NetApiError> {
        self.try_decrypt(ciphertext, salt)
            .ok_or(NetApiError::DecryptFailed)
    }

    fn try_decrypt(&self, ciphertext: &str, salt: &str) -> Option<SecretString> {
        let token = URL_SAFE.decode(ciphertext).ok()?;
        let salt = URL_SAFE.decode(salt).ok()?;
        if salt.is_empty() || token.len() < HEADER_LEN + NONCE_LEN + crypto::TAG_LEN {
            return None;
        }

        let (header, rest) = token.split_at(HEADER_LEN);
        if header[0] != FORMAT_VERSION {
            return None;
        }
        let iterations = u32::from_be_bytes(header[1..].try_into().ok()?);
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
            return None;
        }

        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce.try_into().ok()?;
        let key = kdf::derive_key(
            self.master.expose_secret().as_bytes(),
            &salt,
            NonZeroU32::new(iterations)?,
        );

        let plaintext = crypto::open(&key, &nonce, header, sealed).ok()?;
        let plaintext = std::str::from_utf8(&plaintext).ok()?;
        Some(SecretString::from(plaintext.to_owned()))
    }
}

impl std::fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCodec")
            .field("master", &"[REDACTED]")
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// The decrypt half of the codec, as seen by [`CredentialResolver`](crate::CredentialResolver).
pub trait SecretDecryptor: Send + Sync {
    fn decrypt(&self, ciphertext: &str, salt: &str) -> Result<SecretString, NetApiError>;
}

impl SecretDecryptor for SecretCodec {
    fn decrypt(&self, ciphertext: &str, salt: &str) -> Result<SecretString, NetApiError> {
        SecretCodec::decrypt(self, ciphertext, salt)
    }
}

/// Mask a secret value for display: first 4 + "..." + last 4 characters.
///
/// Values shorter than 10 characters are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

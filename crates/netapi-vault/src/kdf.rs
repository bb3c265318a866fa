// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master passphrase.
//!
//! Each secret carries its own random 16-byte salt, so every secret is sealed
//! under a distinct derived key.

use std::num::NonZeroU32;

use netapi_core::NetApiError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of a freshly generated salt, in bytes.
pub const SALT_LEN: usize = 16;

/// Derive a 32-byte AES key from passphrase and salt.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: NonZeroU32) -> Zeroizing<[u8; 32]> {
    let mut output = Zeroizing::new([0u8; 32]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        output.as_mut(),
    );
    output
}

/// Generate a random salt for a new secret.
pub fn generate_salt() -> Result<[u8; SALT_LEN], NetApiError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| NetApiError::Vault("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iters(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn derive_key_is_deterministic() {
        let key1 = derive_key(b"master", &[1u8; 16], iters(1_000));
        let key2 = derive_key(b"master", &[1u8; 16], iters(1_000));
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn derive_key_depends_on_passphrase() {
        let key1 = derive_key(b"master one", &[2u8; 16], iters(1_000));
        let key2 = derive_key(b"master two", &[2u8; 16], iters(1_000));
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_depends_on_salt() {
        let key1 = derive_key(b"master", &[1u8; 16], iters(1_000));
        let key2 = derive_key(b"master", &[2u8; 16], iters(1_000));
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_depends_on_iterations() {
        let key1 = derive_key(b"master", &[1u8; 16], iters(1_000));
        let key2 = derive_key(b"master", &[1u8; 16], iters(1_001));
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn rfc7914_pbkdf2_sha256_vector() {
        // PBKDF2-HMAC-SHA256("passwd", "salt", c=1), first 32 bytes.
        let key = derive_key(b"passwd", b"salt", iters(1));
        assert_eq!(
            key[..8],
            [0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f]
        );
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}

// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use netapi_core::NetApiError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of the GCM authentication tag appended by [`seal`].
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, NetApiError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| NetApiError::Vault("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// `aad` is authenticated but not encrypted. Returns
/// `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(
    key: &[u8; 32],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), NetApiError> {
    let key = aead_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| NetApiError::Vault("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::from(aad),
        &mut in_out,
    )
    .map_err(|_| NetApiError::Vault("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the tag appended by [`seal`] and `aad` must match
/// the bytes given at seal time. Fails on wrong key, wrong AAD or tampering.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, NetApiError> {
    let key = aead_key(key)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce_bytes),
            Aad::from(aad),
            in_out.as_mut_slice(),
        )
        .map_err(|_| NetApiError::DecryptFailed)?
        .len();

    in_out.truncate(plaintext_len);
    Ok(in_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [7u8; 32];

    #[test]
    fn seal_open_roundtrip() {
        let (ciphertext, nonce) = seal(&KEY, b"hdr", b"device password").unwrap();
        let decrypted = open(&KEY, &nonce, b"hdr", &ciphertext).unwrap();
        assert_eq!(decrypted.as_slice(), b"device password");
    }

    #[test]
    fn seal_uses_fresh_nonce_each_time() {
        let (ct1, nonce1) = seal(&KEY, b"", b"same input twice").unwrap();
        let (ct2, nonce2) = seal(&KEY, b"", b"same input twice").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn ciphertext_carries_tag() {
        let (ciphertext, _) = seal(&KEY, b"", b"hello").unwrap();
        assert_eq!(ciphertext.len(), 5 + TAG_LEN);
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let (ciphertext, nonce) = seal(&KEY, b"", b"secret").unwrap();
        let result = open(&[8u8; 32], &nonce, b"", &ciphertext);
        assert!(matches!(result, Err(NetApiError::DecryptFailed)));
    }

    #[test]
    fn open_with_different_aad_fails() {
        let (ciphertext, nonce) = seal(&KEY, b"\x01\x00\x01\x86\xa0", b"secret").unwrap();
        let result = open(&KEY, &nonce, b"\x01\x00\x01\x86\xa1", &ciphertext);
        assert!(result.is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let (mut ciphertext, nonce) = seal(&KEY, b"", b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&KEY, &nonce, b"", &ciphertext).is_err());
    }
}

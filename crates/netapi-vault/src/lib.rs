// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device credential vault for Net-API.
//!
//! Device secrets are sealed with AES-256-GCM under a key derived per secret
//! from the master passphrase and a random salt via PBKDF2-HMAC-SHA256.
//! [`CredentialResolver`] turns a stored device record into the credential a
//! vendor plugin call needs.

pub mod codec;
pub mod crypto;
pub mod kdf;
pub mod prompt;
pub mod resolver;

pub use codec::{mask_secret, SealedSecret, SecretCodec, SecretDecryptor};
pub use prompt::{get_master_passphrase, get_master_passphrase_with_confirm};
pub use resolver::CredentialResolver;

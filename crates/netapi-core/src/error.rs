// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Net-API vault and dispatcher.

use thiserror::Error;

/// The primary error type used across all Net-API crates.
#[derive(Debug, Error)]
pub enum NetApiError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Device store errors (database connection, query failure, malformed rows).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store has no record for the requested device identifier.
    #[error("device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    /// No plugin is registered for the device's vendor.
    #[error("no plugin registered for vendor `{vendor}`")]
    NoPluginForVendor { vendor: String },

    /// Two configured plugins claim the same vendor.
    #[error("duplicate plugin configured for vendor `{vendor}`")]
    DuplicateVendor { vendor: String },

    /// A stored secret failed its integrity check or was malformed.
    ///
    /// Carries no detail so neither plaintext nor key material can leak.
    #[error("failed to decrypt device secret")]
    DecryptFailed,

    /// The plugin endpoint refused the connection or was unreachable.
    #[error("connection to {vendor} plugin at {endpoint} refused")]
    ConnectionRefused { vendor: String, endpoint: String },

    /// The plugin was reached but the call failed.
    #[error("{vendor} plugin error: {message}")]
    Plugin { vendor: String, message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Vault errors outside of decryption (entropy, key setup, passphrase input).
    #[error("vault error: {0}")]
    Vault(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

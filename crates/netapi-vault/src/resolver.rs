// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a device identifier into call-ready credentials.
//!
//! Token devices pass their token through untouched. Secret devices are
//! decrypted on a blocking thread, since PBKDF2 at the configured cost takes
//! long enough to stall an async worker. Nothing is cached between calls.

use std::sync::Arc;
use std::time::Duration;

use netapi_core::{Credential, DeviceAuth, DeviceRecord, DeviceStore, NetApiError};
use secrecy::SecretString;
use tracing::debug;

use crate::codec::SecretDecryptor;

/// Store lookup bound used by [`CredentialResolver::resolve`] unless overridden.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves device credentials through a [`DeviceStore`] and a [`SecretDecryptor`].
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn DeviceStore>,
    codec: Arc<dyn SecretDecryptor>,
    store_timeout: Duration,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn DeviceStore>, codec: Arc<dyn SecretDecryptor>) -> Self {
        Self {
            store,
            codec,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound on the store read done by [`resolve`](Self::resolve).
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Fetch the device and resolve its credential.
    ///
    /// A store that does not answer within the store timeout yields
    /// [`NetApiError::Timeout`].
    pub async fn resolve(&self, device_id: &str) -> Result<Credential, NetApiError> {
        let record = tokio::time::timeout(self.store_timeout, self.store.fetch_device(device_id))
            .await
            .map_err(|_| NetApiError::Timeout {
                duration: self.store_timeout,
            })??
            .ok_or_else(|| NetApiError::DeviceNotFound {
                device_id: device_id.to_string(),
            })?;
        self.resolve_record(&record).await
    }

    /// Resolve the credential of an already-fetched record.
    pub async fn resolve_record(&self, record: &DeviceRecord) -> Result<Credential, NetApiError> {
        match &record.auth {
            DeviceAuth::Token { token } => {
                debug!(device_id = %record.device_id, "resolved token credential");
                Ok(Credential::Token(SecretString::from(token.clone())))
            }
            DeviceAuth::Secret {
                username,
                ciphertext,
                salt,
            } => {
                let codec = Arc::clone(&self.codec);
                let (ciphertext, salt) = (ciphertext.clone(), salt.clone());
                let secret = tokio::task::spawn_blocking(move || codec.decrypt(&ciphertext, &salt))
                    .await
                    .map_err(|e| NetApiError::Internal(format!("decrypt task failed: {e}")))??;

                debug!(device_id = %record.device_id, "resolved secret credential");
                Ok(Credential::Secret {
                    username: username.clone(),
                    secret,
                })
            }
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("store", &self.store.name())
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

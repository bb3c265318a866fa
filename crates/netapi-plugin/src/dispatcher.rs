// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability dispatch: device id + capability in, payload or error envelope out.
//!
//! Every invocation does one store read, one registry lookup, one credential
//! resolution and at most one remote call. Nothing is shared between
//! invocations except the registry and its permit pools.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use netapi_config::NetApiConfig;
use netapi_core::{
    CallTarget, Capability, DeviceRecord, DeviceStore, ErrorEnvelope, ErrorKind, NetApiError,
    Payload,
};
use netapi_security::redact;
use netapi_vault::{CredentialResolver, SecretDecryptor};

use crate::registry::PluginRegistry;

/// Upper bounds on the two awaited steps of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTimeouts {
    pub store: Duration,
    pub call: Duration,
}

impl DispatchTimeouts {
    pub fn from_config(config: &NetApiConfig) -> Self {
        Self {
            store: Duration::from_secs(config.storage.store_timeout_secs),
            call: Duration::from_secs(config.dispatch.call_timeout_secs),
        }
    }
}

impl Default for DispatchTimeouts {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(5),
            call: Duration::from_secs(30),
        }
    }
}

/// Routes capability requests to vendor plugins.
pub struct PluginDispatcher {
    store: Arc<dyn DeviceStore>,
    registry: Arc<PluginRegistry>,
    resolver: CredentialResolver,
    timeouts: DispatchTimeouts,
}

impl PluginDispatcher {
    pub fn new(
        store: Arc<dyn DeviceStore>,
        registry: Arc<PluginRegistry>,
        codec: Arc<dyn SecretDecryptor>,
        timeouts: DispatchTimeouts,
    ) -> Self {
        let resolver =
            CredentialResolver::new(Arc::clone(&store), codec).with_store_timeout(timeouts.store);
        Self {
            store,
            registry,
            resolver,
            timeouts,
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Run `capability` against `device_id` through the device vendor's plugin.
    ///
    /// Success returns the plugin payload unchanged. Failures come back as an
    /// [`ErrorEnvelope`] whose detail is scrubbed of the call's credentials.
    pub async fn invoke(
        &self,
        device_id: &str,
        capability: Capability,
    ) -> Result<Payload, ErrorEnvelope> {
        let result = self.dispatch(device_id, capability).await;
        match &result {
            Ok(_) => info!(device_id, %capability, "capability dispatched"),
            Err(envelope) => warn!(
                device_id,
                %capability,
                kind = %envelope.kind,
                detail = envelope.detail.as_deref().unwrap_or(""),
                "capability dispatch failed"
            ),
        }
        result
    }

    async fn dispatch(
        &self,
        device_id: &str,
        capability: Capability,
    ) -> Result<Payload, ErrorEnvelope> {
        let record = self.fetch(device_id).await?;

        let handle = self
            .registry
            .lookup(&record.vendor)
            .map_err(|e| envelope_for(e, &record.vendor, &[]))?;

        let credential = self
            .resolver
            .resolve_record(&record)
            .await
            .map_err(|e| envelope_for(e, &record.vendor, &[]))?;

        let target = CallTarget {
            host: &record.host,
            auth: credential.call_auth(),
        };
        debug!(
            device_id,
            vendor = %record.vendor,
            auth_type = %credential.auth_type(),
            "invoking plugin"
        );

        let call = tokio::time::timeout(self.timeouts.call, handle.call(capability, &target));
        let outcome = match call.await {
            Ok(outcome) => outcome,
            Err(_) => Err(NetApiError::Timeout {
                duration: self.timeouts.call,
            }),
        };

        outcome.map_err(|e| envelope_for(e, &record.vendor, &credential.sensitive_values()))
    }

    async fn fetch(&self, device_id: &str) -> Result<DeviceRecord, ErrorEnvelope> {
        match tokio::time::timeout(self.timeouts.store, self.store.fetch_device(device_id)).await {
            Ok(Ok(Some(record))) => Ok(record),
            Ok(Ok(None)) => Err(ErrorEnvelope::with_detail(ErrorKind::DeviceNotFound, device_id)),
            Ok(Err(e)) => Err(ErrorEnvelope::with_detail(
                ErrorKind::StoreUnavailable,
                format!("{}: {e}", self.store.name()),
            )),
            Err(_) => Err(ErrorEnvelope::with_detail(
                ErrorKind::StoreUnavailable,
                format!(
                    "{}: no response within {:?}",
                    self.store.name(),
                    self.timeouts.store
                ),
            )),
        }
    }
}

/// Classify an error into the caller-facing envelope.
///
/// Plugin-side failures are prefixed with `vendor`. Only message text that
/// came back from the failing side is scrubbed of `sensitive` values; the
/// vendor prefix and refused endpoint are ours and stay verbatim.
fn envelope_for(err: NetApiError, vendor: &str, sensitive: &[&str]) -> ErrorEnvelope {
    let scrub = |message: &str| redact(message, sensitive);
    let (kind, detail) = match err {
        NetApiError::DeviceNotFound { device_id } => (ErrorKind::DeviceNotFound, Some(device_id)),
        NetApiError::NoPluginForVendor { vendor } => (ErrorKind::NoPluginForVendor, Some(vendor)),
        NetApiError::DecryptFailed => (ErrorKind::DecryptFailed, None),
        NetApiError::ConnectionRefused { vendor, endpoint } => (
            ErrorKind::ConnectionRefused,
            Some(format!("{vendor}: connection refused at {endpoint}")),
        ),
        NetApiError::Plugin { vendor, message } => (
            ErrorKind::PluginError,
            Some(format!("{vendor}: {}", scrub(&message))),
        ),
        NetApiError::Storage { source } => {
            (ErrorKind::StoreUnavailable, Some(scrub(&source.to_string())))
        }
        other => (
            ErrorKind::PluginError,
            Some(format!("{vendor}: {}", scrub(&other.to_string()))),
        ),
    };

    ErrorEnvelope { kind, detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netapi_test_utils::fixtures::token_device;
    use netapi_test_utils::{MemoryDeviceStore, MockPlugin};
    use netapi_vault::SecretCodec;
    use secrecy::SecretString;
    use tracing_test::traced_test;

    use crate::registry::PluginHandle;

    #[test]
    fn decrypt_failed_has_no_detail() {
        let envelope = envelope_for(NetApiError::DecryptFailed, "juniper", &[]);
        assert_eq!(envelope, ErrorEnvelope::new(ErrorKind::DecryptFailed));
    }

    #[test]
    fn plugin_error_detail_is_vendor_prefixed_and_redacted() {
        let envelope = envelope_for(
            NetApiError::Plugin {
                vendor: "juniper".to_string(),
                message: "login as netops with hunter2 rejected".to_string(),
            },
            "juniper",
            &["netops", "hunter2"],
        );
        assert_eq!(envelope.kind, ErrorKind::PluginError);
        assert_eq!(
            envelope.detail.as_deref(),
            Some("juniper: login as [REDACTED] with [REDACTED] rejected")
        );
    }

    #[test]
    fn connection_refused_names_endpoint() {
        let envelope = envelope_for(
            NetApiError::ConnectionRefused {
                vendor: "juniper".to_string(),
                endpoint: "10.0.0.5:9000".to_string(),
            },
            "juniper",
            &[],
        );
        assert_eq!(envelope.kind, ErrorKind::ConnectionRefused);
        assert!(envelope.detail.unwrap().contains("10.0.0.5:9000"));
    }

    #[test]
    fn refused_endpoint_survives_short_credentials() {
        let envelope = envelope_for(
            NetApiError::ConnectionRefused {
                vendor: "juniper".to_string(),
                endpoint: "10.0.0.5:9000".to_string(),
            },
            "juniper",
            &["admin", "0"],
        );
        assert_eq!(
            envelope.detail.as_deref(),
            Some("juniper: connection refused at 10.0.0.5:9000")
        );
    }

    #[test]
    fn vendor_prefix_is_never_redacted() {
        let envelope = envelope_for(
            NetApiError::Plugin {
                vendor: "juniper".to_string(),
                message: "juni refused the session".to_string(),
            },
            "juniper",
            &["juni"],
        );
        assert_eq!(
            envelope.detail.as_deref(),
            Some("juniper: [REDACTED] refused the session")
        );
    }

    #[test]
    fn internal_errors_surface_as_plugin_errors() {
        let envelope = envelope_for(
            NetApiError::Internal("permit pool closed".to_string()),
            "cisco",
            &[],
        );
        assert_eq!(envelope.kind, ErrorKind::PluginError);
        assert!(envelope.detail.unwrap().starts_with("cisco: "));
    }

    #[test]
    fn call_timeout_is_a_plugin_error() {
        let envelope = envelope_for(
            NetApiError::Timeout {
                duration: Duration::from_secs(30),
            },
            "cisco",
            &[],
        );
        assert_eq!(envelope.kind, ErrorKind::PluginError);
        assert!(envelope.detail.unwrap().starts_with("cisco: "));
    }

    #[test]
    fn timeouts_from_config() {
        let mut config = NetApiConfig::default();
        config.storage.store_timeout_secs = 2;
        config.dispatch.call_timeout_secs = 9;
        let timeouts = DispatchTimeouts::from_config(&config);
        assert_eq!(timeouts.store, Duration::from_secs(2));
        assert_eq!(timeouts.call, Duration::from_secs(9));
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_is_logged_without_the_token() {
        let plugin = Arc::new(MockPlugin::new("cisco"));
        plugin.push_error("token tok-77aa9 rejected").await;
        let registry =
            PluginRegistry::from_plugins([PluginHandle::new(plugin, "mock:0", "", 1)]).unwrap();
        let store = MemoryDeviceStore::with_devices([token_device("D2", "10.0.0.9", "cisco", "tok-77aa9")]);
        let dispatcher = PluginDispatcher::new(
            Arc::new(store),
            Arc::new(registry),
            Arc::new(SecretCodec::new(SecretString::from("master".to_string()))),
            DispatchTimeouts::default(),
        );

        let envelope = dispatcher.invoke("D2", Capability::Vlans).await.unwrap_err();
        assert_eq!(envelope.detail.as_deref(), Some("cisco: token [REDACTED] rejected"));
        assert!(logs_contain("capability dispatch failed"));
        assert!(!logs_contain("tok-77aa9"));
    }
}

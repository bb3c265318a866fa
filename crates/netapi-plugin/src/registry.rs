// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendor-keyed registry of plugin handles.
//!
//! The `PluginRegistry` is built once at startup and is read-only afterwards.
//! Each `PluginHandle` pairs a `VendorPlugin` with a semaphore that bounds the
//! number of calls in flight to that plugin.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::info;

use netapi_config::model::{DispatchConfig, PluginConfig};
use netapi_core::{call_capability, CallTarget, Capability, NetApiError, Payload, VendorPlugin};

use crate::client::JsonRpcPluginClient;

/// One registered plugin.
pub struct PluginHandle {
    plugin: Arc<dyn VendorPlugin>,
    endpoint: String,
    description: String,
    max_in_flight: usize,
    permits: Semaphore,
}

impl PluginHandle {
    /// Wrap `plugin`, allowing at most `max_in_flight` concurrent calls.
    pub fn new(
        plugin: Arc<dyn VendorPlugin>,
        endpoint: impl Into<String>,
        description: impl Into<String>,
        max_in_flight: usize,
    ) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            plugin,
            endpoint: endpoint.into(),
            description: description.into(),
            max_in_flight,
            permits: Semaphore::new(max_in_flight),
        }
    }

    pub fn vendor(&self) -> &str {
        self.plugin.vendor()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Permits not currently held by a call.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Invoke `capability`, waiting for a permit first.
    ///
    /// The permit is released when the call finishes or the future is dropped.
    pub async fn call(
        &self,
        capability: Capability,
        target: &CallTarget<'_>,
    ) -> Result<Payload, NetApiError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| NetApiError::Internal("plugin permit pool closed".to_string()))?;
        call_capability(self.plugin.as_ref(), capability, target).await
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("vendor", &self.vendor())
            .field("endpoint", &self.endpoint)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

/// Registry of plugin handles keyed by vendor (exact, case-sensitive).
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: HashMap<String, PluginHandle>,
}

impl PluginRegistry {
    /// Build one JSON-RPC handle per configured plugin.
    ///
    /// No plugin is contacted here; an unreachable endpoint surfaces on the
    /// first call. A vendor configured twice is rejected.
    pub fn load(plugins: &[PluginConfig], dispatch: &DispatchConfig) -> Result<Self, NetApiError> {
        let connect_timeout = Duration::from_secs(dispatch.connect_timeout_secs);
        let call_timeout = Duration::from_secs(dispatch.call_timeout_secs);

        let mut handles = Vec::with_capacity(plugins.len());
        for config in plugins {
            let client = JsonRpcPluginClient::new(config, connect_timeout, call_timeout)?;
            handles.push(PluginHandle::new(
                Arc::new(client),
                config.endpoint(),
                config.description.clone(),
                config.max_in_flight.unwrap_or(dispatch.default_max_in_flight),
            ));
        }

        let registry = Self::from_plugins(handles)?;
        info!(plugins = registry.len(), "plugin registry loaded");
        Ok(registry)
    }

    /// Build a registry from ready-made handles, rejecting duplicate vendors.
    pub fn from_plugins(
        handles: impl IntoIterator<Item = PluginHandle>,
    ) -> Result<Self, NetApiError> {
        let mut entries = HashMap::new();
        for handle in handles {
            let vendor = handle.vendor().to_string();
            if entries.contains_key(&vendor) {
                return Err(NetApiError::DuplicateVendor { vendor });
            }
            entries.insert(vendor, handle);
        }
        Ok(Self { entries })
    }

    /// Find the handle for `vendor`.
    pub fn lookup(&self, vendor: &str) -> Result<&PluginHandle, NetApiError> {
        self.entries
            .get(vendor)
            .ok_or_else(|| NetApiError::NoPluginForVendor {
                vendor: vendor.to_string(),
            })
    }

    /// All handles, sorted by vendor.
    pub fn list(&self) -> Vec<&PluginHandle> {
        let mut handles: Vec<&PluginHandle> = self.entries.values().collect();
        handles.sort_by(|a, b| a.vendor().cmp(b.vendor()));
        handles
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netapi_test_utils::MockPlugin;

    fn plugin_config(vendor: &str, port: u16) -> PluginConfig {
        PluginConfig {
            vendor: vendor.to_string(),
            host: "127.0.0.1".to_string(),
            port,
            description: format!("{vendor} plugin"),
            max_in_flight: None,
        }
    }

    fn mock_handle(vendor: &str) -> PluginHandle {
        PluginHandle::new(Arc::new(MockPlugin::new(vendor)), "mock:0", "", 4)
    }

    #[test]
    fn load_builds_one_handle_per_entry() {
        let mut cisco = plugin_config("cisco", 9001);
        cisco.max_in_flight = Some(2);
        let registry = PluginRegistry::load(
            &[plugin_config("juniper", 9000), cisco],
            &DispatchConfig::default(),
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        let juniper = registry.lookup("juniper").unwrap();
        assert_eq!(juniper.endpoint(), "127.0.0.1:9000");
        assert_eq!(juniper.description(), "juniper plugin");
        assert_eq!(juniper.max_in_flight(), 8);
        assert_eq!(registry.lookup("cisco").unwrap().max_in_flight(), 2);
    }

    #[test]
    fn load_rejects_duplicate_vendor() {
        let result = PluginRegistry::load(
            &[plugin_config("juniper", 9000), plugin_config("juniper", 9001)],
            &DispatchConfig::default(),
        );
        assert!(matches!(
            result,
            Err(NetApiError::DuplicateVendor { vendor }) if vendor == "juniper"
        ));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = PluginRegistry::from_plugins([mock_handle("juniper")]).unwrap();
        assert!(registry.lookup("juniper").is_ok());
        assert!(matches!(
            registry.lookup("Juniper"),
            Err(NetApiError::NoPluginForVendor { vendor }) if vendor == "Juniper"
        ));
    }

    #[test]
    fn list_is_sorted_by_vendor() {
        let registry = PluginRegistry::from_plugins([
            mock_handle("nokia"),
            mock_handle("arista"),
            mock_handle("juniper"),
        ])
        .unwrap();
        let vendors: Vec<&str> = registry.list().iter().map(|h| h.vendor()).collect();
        assert_eq!(vendors, vec!["arista", "juniper", "nokia"]);
    }

    #[test]
    fn empty_registry() {
        let registry = PluginRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.lookup("anything").is_err());
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let handle = PluginHandle::new(Arc::new(MockPlugin::new("x")), "e", "", 0);
        assert_eq!(handle.max_in_flight(), 1);
        assert_eq!(handle.available_permits(), 1);
    }
}

// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Net-API.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Lowest PBKDF2 iteration count the vault accepts.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Highest PBKDF2 iteration count the vault accepts.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

/// Top-level Net-API configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NetApiConfig {
    /// Process-level settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Device store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Remote call settings shared by all plugins.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Vendor plugins, one `[[plugins]]` table each.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Device store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding device records.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Upper bound on a single device lookup, in seconds.
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("netapi").join("netapi.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("netapi.db"))
        .to_string_lossy()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_store_timeout_secs() -> u64 {
    5
}

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iterations used for newly encrypted secrets.
    ///
    /// Existing secrets record their own count, so raising this does not
    /// invalidate them.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

/// Remote call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Upper bound on a single plugin call, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// TCP connect timeout for plugin endpoints, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// In-flight call limit for plugins that do not set `max_in_flight`.
    #[serde(default = "default_max_in_flight")]
    pub default_max_in_flight: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            default_max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_max_in_flight() -> usize {
    8
}

/// One vendor plugin endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Vendor key matched against the device's `vendor` field.
    pub vendor: String,

    /// Host of the plugin's RPC server.
    pub host: String,

    /// Port of the plugin's RPC server.
    pub port: u16,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Overrides `dispatch.default_max_in_flight` for this plugin.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

impl PluginConfig {
    /// `host:port` form of the endpoint. IPv6 literals are bracketed.
    pub fn endpoint(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = NetApiConfig::default();
        assert_eq!(config.service.log_level, "info");
        assert!(config.storage.wal_mode);
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert_eq!(config.dispatch.call_timeout_secs, 30);
        assert_eq!(config.dispatch.default_max_in_flight, 8);
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn plugins_array_deserializes() {
        let toml_str = r#"
[[plugins]]
vendor = "juniper"
host = "10.0.0.5"
port = 9000
description = "Junos via PyEZ"

[[plugins]]
vendor = "cisco"
host = "10.0.0.9"
port = 9000
max_in_flight = 2
"#;
        let config: NetApiConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.plugins.len(), 2);
        assert_eq!(config.plugins[0].endpoint(), "10.0.0.5:9000");
        assert_eq!(config.plugins[0].description, "Junos via PyEZ");
        assert_eq!(config.plugins[0].max_in_flight, None);
        assert_eq!(config.plugins[1].description, "");
        assert_eq!(config.plugins[1].max_in_flight, Some(2));
    }

    #[test]
    fn ipv6_endpoints_are_bracketed() {
        let mut plugin = PluginConfig {
            vendor: "juniper".to_string(),
            host: "::1".to_string(),
            port: 9000,
            description: String::new(),
            max_in_flight: None,
        };
        assert_eq!(plugin.endpoint(), "[::1]:9000");

        plugin.host = "[fd00::5]".to_string();
        assert_eq!(plugin.endpoint(), "[fd00::5]:9000");

        plugin.host = "plugins.lab".to_string();
        assert_eq!(plugin.endpoint(), "plugins.lab:9000");
    }

    #[test]
    fn plugins_deny_unknown_fields() {
        let toml_str = r#"
[[plugins]]
vendor = "juniper"
host = "10.0.0.5"
port = 9000
protocol = "xmlrpc"
"#;
        assert!(toml::from_str::<NetApiConfig>(toml_str).is_err());
    }

    #[test]
    fn plugin_port_must_fit_u16() {
        let toml_str = r#"
[[plugins]]
vendor = "juniper"
host = "10.0.0.5"
port = 70000
"#;
        assert!(toml::from_str::<NetApiConfig>(toml_str).is_err());
    }
}

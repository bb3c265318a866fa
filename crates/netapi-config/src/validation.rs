// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as minimum KDF cost, non-zero timeouts, and unique plugin vendors.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS, NetApiConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NetApiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` must be one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.storage.store_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.store_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    } else if config.vault.kdf_iterations > MAX_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at most {MAX_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.dispatch.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.call_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.dispatch.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.connect_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.dispatch.default_max_in_flight == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.default_max_in_flight must be at least 1".to_string(),
        });
    }

    let mut seen_vendors = HashSet::new();
    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.vendor.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].vendor must not be empty"),
            });
        } else if !seen_vendors.insert(plugin.vendor.as_str()) {
            // Vendor matching is case-sensitive, so only exact repeats collide.
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate plugin vendor `{}` in [[plugins]] array",
                    plugin.vendor
                ),
            });
        }

        if plugin.host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].host must not be empty"),
            });
        }

        if plugin.port == 0 {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].port must not be 0"),
            });
        }

        if plugin.max_in_flight == Some(0) {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].max_in_flight must be at least 1"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

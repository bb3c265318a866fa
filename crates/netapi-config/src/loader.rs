// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./netapi.toml` > `~/.config/netapi/netapi.toml` > `/etc/netapi/netapi.toml`
//! with environment variable overrides via `NETAPI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NetApiConfig;

/// Config sections reachable through `NETAPI_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["service", "storage", "vault", "dispatch"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/netapi/netapi.toml` (system-wide)
/// 3. `~/.config/netapi/netapi.toml` (user XDG config)
/// 4. `./netapi.toml` (local directory)
/// 5. `NETAPI_*` environment variables
pub fn load_config() -> Result<NetApiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<NetApiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NetApiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NetApiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NetApiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NetApiConfig::default()))
        .merge(Toml::file("/etc/netapi/netapi.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("netapi/netapi.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("netapi.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `NETAPI_STORAGE_DATABASE_PATH` to
/// `storage.database_path`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// underscore-containing keys survive. Variables outside the known sections
/// (such as `NETAPI_MASTER_PW`) are not config keys and are skipped.
/// `[[plugins]]` cannot be set from the environment.
fn env_provider() -> Env {
    Env::prefixed("NETAPI_")
        .filter(|key| section_of(&key.as_str().to_ascii_lowercase()).is_some())
        .map(|key| {
            let key_str = key.as_str().to_ascii_lowercase();
            match section_of(&key_str) {
                Some(section) => {
                    format!("{section}.{}", &key_str[section.len() + 1..]).into()
                }
                None => key_str.into(),
            }
        })
}

fn section_of(key: &str) -> Option<&'static str> {
    ENV_SECTIONS.iter().copied().find(|section| {
        key.len() > section.len() + 1
            && key.starts_with(section)
            && key.as_bytes()[section.len()] == b'_'
    })
}

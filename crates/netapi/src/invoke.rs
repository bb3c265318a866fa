// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `netapi plugins` and `netapi invoke` command implementation.

use std::io::IsTerminal;
use std::sync::Arc;

use netapi_config::model::NetApiConfig;
use netapi_core::{Capability, NetApiError};
use netapi_plugin::{DispatchTimeouts, PluginDispatcher, PluginRegistry};
use netapi_storage::SqliteDeviceStore;
use serde_json::{json, Value};

use crate::secrets::open_codec;

fn registry_rows(registry: &PluginRegistry) -> Vec<Value> {
    registry
        .list()
        .into_iter()
        .map(|handle| {
            json!({
                "vendor": handle.vendor(),
                "endpoint": handle.endpoint(),
                "max_in_flight": handle.max_in_flight(),
                "description": handle.description(),
            })
        })
        .collect()
}

/// Run the `netapi plugins` command.
pub fn run_plugins(config: &NetApiConfig, json: bool) -> Result<(), NetApiError> {
    let registry = PluginRegistry::load(&config.plugins, &config.dispatch)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&registry_rows(&registry))
                .unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    if registry.is_empty() {
        println!("no plugins configured");
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    println!("  {:<12} {:<22} {:>6}  DESCRIPTION", "VENDOR", "ENDPOINT", "LIMIT");
    for handle in registry.list() {
        let vendor = if use_color {
            use colored::Colorize;
            format!("{:<12}", handle.vendor()).cyan().to_string()
        } else {
            format!("{:<12}", handle.vendor())
        };
        println!(
            "  {vendor} {:<22} {:>6}  {}",
            handle.endpoint(),
            handle.max_in_flight(),
            handle.description()
        );
    }
    Ok(())
}

/// Run the `netapi invoke` command.
///
/// Prints the payload on success or the error envelope on failure, both as
/// JSON on stdout. Returns whether the dispatch succeeded.
pub async fn run_invoke(
    config: &NetApiConfig,
    device_id: &str,
    capability: Capability,
) -> Result<bool, NetApiError> {
    let registry = PluginRegistry::load(&config.plugins, &config.dispatch)?;
    let codec = open_codec(config, false)?;
    let store = Arc::new(SqliteDeviceStore::open(&config.storage).await?);

    let dispatcher = PluginDispatcher::new(
        Arc::clone(&store) as Arc<dyn netapi_core::DeviceStore>,
        Arc::new(registry),
        Arc::new(codec),
        DispatchTimeouts::from_config(config),
    );

    let outcome = dispatcher.invoke(device_id, capability).await;
    store.close().await?;

    let (ok, body) = match outcome {
        Ok(payload) => (true, payload),
        Err(envelope) => {
            let status = envelope.http_status();
            (false, json!({ "error": envelope, "status": status }))
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
    );
    Ok(ok)
}

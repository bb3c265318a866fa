// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Net-API - device credential vault and vendor plugin dispatcher.
//!
//! This is the operator CLI: it seals device secrets, manages the device
//! table, and runs single capability dispatches against configured plugins.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod device;
mod invoke;
mod secrets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use netapi_config::model::NetApiConfig;
use netapi_core::Capability;

/// Net-API - device credential vault and vendor plugin dispatcher.
#[derive(Parser, Debug)]
#[command(name = "netapi", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a device password, printing ciphertext and salt.
    Encrypt {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Check that a ciphertext/salt pair opens, showing a masked preview.
    Decrypt {
        /// Ciphertext token produced by `encrypt`.
        ciphertext: String,
        /// Salt produced by `encrypt`.
        salt: String,
    },
    /// Manage stored devices.
    Device {
        #[command(subcommand)]
        action: DeviceCommands,
    },
    /// List configured vendor plugins.
    Plugins {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run one capability against a device and print the result.
    Invoke {
        /// Device identifier.
        device_id: String,
        /// Capability name, e.g. `device-info` or `lldp-neighbors`.
        capability: Capability,
    },
}

/// Device management subcommands.
#[derive(Subcommand, Debug)]
enum DeviceCommands {
    /// Add a device. Secret devices prompt for the password, token devices
    /// prompt for the token.
    Add {
        /// Device network address handed to the plugin.
        #[arg(long)]
        host: String,
        /// Vendor key selecting the plugin.
        #[arg(long)]
        vendor: String,
        /// Device identifier (generated when omitted).
        #[arg(long)]
        id: Option<String>,
        /// Login name; makes this a secret-auth device.
        #[arg(long, conflicts_with = "token")]
        username: Option<String>,
        /// Make this a token-auth device.
        #[arg(long)]
        token: bool,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        device_type: Option<String>,
    },
    /// List devices (no credential material is shown).
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Remove a device.
    Remove {
        /// Device identifier.
        id: String,
    },
    /// Re-encrypt a secret device's password.
    Rotate {
        /// Device identifier.
        id: String,
        /// New login name (keeps the current one when omitted).
        #[arg(long)]
        username: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> NetApiConfig {
    let result = match path {
        Some(path) => netapi_config::load_and_validate_path(path),
        None => netapi_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            netapi_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Output goes to stderr through the redacting writer so stdout stays
/// reserved for command results.
fn init_tracing(log_level: &str) {
    use netapi_security::RedactingWriter;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("netapi={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(|| RedactingWriter::new(std::io::stderr()))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Some(Commands::Encrypt { json }) => secrets::run_encrypt(&config, json),
        Some(Commands::Decrypt { ciphertext, salt }) => {
            secrets::run_decrypt(&config, &ciphertext, &salt).await
        }
        Some(Commands::Device { action }) => device::run_device(&config, action).await,
        Some(Commands::Plugins { json }) => invoke::run_plugins(&config, json),
        Some(Commands::Invoke {
            device_id,
            capability,
        }) => match invoke::run_invoke(&config, &device_id, capability).await {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(2),
            Err(e) => Err(e),
        },
        None => {
            println!("netapi: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("netapi: {e}");
        std::process::exit(1);
    }
}

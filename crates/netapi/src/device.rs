// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `netapi device` command implementation.
//!
//! Secrets are sealed before they reach the store. Listings show the auth
//! type only, never usernames, ciphertext, or tokens.

use std::io::IsTerminal;

use netapi_config::model::NetApiConfig;
use netapi_core::{DeviceAuth, DeviceRecord, NetApiError};
use netapi_storage::SqliteDeviceStore;
use netapi_vault::SecretCodec;
use serde_json::{json, Value};
use tracing::info;

use crate::DeviceCommands;
use crate::secrets::{open_codec, read_device_secret};

/// Identity fields of a new device, as given on the command line.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub id: Option<String>,
    pub host: String,
    pub vendor: String,
    pub name: Option<String>,
    pub site: Option<String>,
    pub device_type: Option<String>,
}

/// Credential material for a new device.
pub enum NewAuth<'a> {
    Secret {
        username: String,
        password: &'a str,
        codec: &'a SecretCodec,
    },
    Token(&'a str),
}

/// Build the record to insert, sealing the password of secret devices.
pub fn build_record(device: NewDevice, auth: NewAuth<'_>) -> Result<DeviceRecord, NetApiError> {
    if device.host.is_empty() || device.vendor.is_empty() {
        return Err(NetApiError::Config(
            "device host and vendor must not be empty".to_string(),
        ));
    }

    let auth = match auth {
        NewAuth::Secret {
            username,
            password,
            codec,
        } => {
            let sealed = codec.encrypt(password)?;
            DeviceAuth::Secret {
                username,
                ciphertext: sealed.ciphertext,
                salt: sealed.salt,
            }
        }
        NewAuth::Token(token) => DeviceAuth::Token {
            token: token.to_string(),
        },
    };

    Ok(DeviceRecord {
        device_id: device
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        host: device.host,
        vendor: device.vendor,
        name: device.name,
        site: device.site,
        device_type: device.device_type,
        auth,
    })
}

/// Credential-free view of a device for listings.
pub fn device_summary(record: &DeviceRecord) -> Value {
    json!({
        "id": record.device_id,
        "host": record.host,
        "vendor": record.vendor,
        "name": record.name,
        "site": record.site,
        "device_type": record.device_type,
        "auth_type": record.auth.auth_type().to_string(),
    })
}

/// Run a `netapi device` subcommand.
pub async fn run_device(config: &NetApiConfig, action: DeviceCommands) -> Result<(), NetApiError> {
    let store = SqliteDeviceStore::open(&config.storage).await?;
    let result = match action {
        DeviceCommands::Add {
            host,
            vendor,
            id,
            username,
            token,
            name,
            site,
            device_type,
        } => {
            let device = NewDevice {
                id,
                host,
                vendor,
                name,
                site,
                device_type,
            };
            add(config, &store, device, username, token).await
        }
        DeviceCommands::List { json } => list(&store, json).await,
        DeviceCommands::Remove { id } => remove(&store, &id).await,
        DeviceCommands::Rotate { id, username } => rotate(config, &store, &id, username).await,
    };
    store.close().await?;
    result
}

async fn add(
    config: &NetApiConfig,
    store: &SqliteDeviceStore,
    device: NewDevice,
    username: Option<String>,
    token: bool,
) -> Result<(), NetApiError> {
    let record = match (username, token) {
        (Some(username), false) => {
            let codec = open_codec(config, true)?;
            let password = read_device_secret("password")?;
            build_record(
                device,
                NewAuth::Secret {
                    username,
                    password: &password,
                    codec: &codec,
                },
            )?
        }
        (None, true) => {
            let token = read_device_secret("token")?;
            build_record(device, NewAuth::Token(&token))?
        }
        _ => {
            return Err(NetApiError::Config(
                "pass exactly one of --username or --token".to_string(),
            ));
        }
    };

    store.insert_device(&record).await?;
    info!(device_id = %record.device_id, vendor = %record.vendor, "device added");
    println!("added {}", record.device_id);
    Ok(())
}

async fn list(store: &SqliteDeviceStore, json: bool) -> Result<(), NetApiError> {
    let devices = store.list_devices().await?;

    if json {
        let summaries: Vec<Value> = devices.iter().map(device_summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    if devices.is_empty() {
        println!("no devices");
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    println!("  {:<20} {:<12} {:<20} {:<7} SITE", "ID", "VENDOR", "HOST", "AUTH");
    for record in &devices {
        let id = if use_color {
            use colored::Colorize;
            format!("{:<20}", record.device_id).bold().to_string()
        } else {
            format!("{:<20}", record.device_id)
        };
        println!(
            "  {id} {:<12} {:<20} {:<7} {}",
            record.vendor,
            record.host,
            record.auth.auth_type(),
            record.site.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn remove(store: &SqliteDeviceStore, id: &str) -> Result<(), NetApiError> {
    if !store.delete_device(id).await? {
        return Err(NetApiError::DeviceNotFound {
            device_id: id.to_string(),
        });
    }
    info!(device_id = id, "device removed");
    println!("removed {id}");
    Ok(())
}

async fn rotate(
    config: &NetApiConfig,
    store: &SqliteDeviceStore,
    id: &str,
    username: Option<String>,
) -> Result<(), NetApiError> {
    let current = store
        .get_device(id)
        .await?
        .ok_or_else(|| NetApiError::DeviceNotFound {
            device_id: id.to_string(),
        })?;
    let DeviceAuth::Secret {
        username: current_username,
        ..
    } = current.auth
    else {
        return Err(NetApiError::Config(format!(
            "device `{id}` uses token auth; remove and re-add it to change the token"
        )));
    };

    let codec = open_codec(config, true)?;
    let password = read_device_secret("password")?;
    let sealed = codec.encrypt(&password)?;
    let username = username.unwrap_or(current_username);

    store
        .update_device_secret(id, &username, &sealed.ciphertext, &sealed.salt)
        .await?;
    info!(device_id = id, "device secret rotated");
    println!("rotated {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netapi_core::AuthType;
    use netapi_test_utils::fixtures::secret_device;
    use secrecy::{ExposeSecret, SecretString};

    fn new_device(id: Option<&str>) -> NewDevice {
        NewDevice {
            id: id.map(str::to_string),
            host: "10.0.0.5".to_string(),
            vendor: "juniper".to_string(),
            name: Some("edge-1".to_string()),
            site: None,
            device_type: None,
        }
    }

    #[test]
    fn secret_device_is_sealed_before_storage() {
        let codec = SecretCodec::new(SecretString::from("master".to_string()));
        let record = build_record(
            new_device(Some("D1")),
            NewAuth::Secret {
                username: "netops".to_string(),
                password: "Juniper-r0cks",
                codec: &codec,
            },
        )
        .unwrap();

        assert_eq!(record.device_id, "D1");
        let DeviceAuth::Secret {
            username,
            ciphertext,
            salt,
        } = &record.auth
        else {
            panic!("expected secret auth");
        };
        assert_eq!(username, "netops");
        assert!(!ciphertext.contains("Juniper-r0cks"));
        let opened = codec.decrypt(ciphertext, salt).unwrap();
        assert_eq!(opened.expose_secret(), "Juniper-r0cks");
    }

    #[test]
    fn token_device_keeps_token_as_is() {
        let record = build_record(new_device(Some("D2")), NewAuth::Token("T")).unwrap();
        assert_eq!(
            record.auth,
            DeviceAuth::Token {
                token: "T".to_string()
            }
        );
    }

    #[test]
    fn missing_id_is_generated() {
        let a = build_record(new_device(None), NewAuth::Token("T")).unwrap();
        let b = build_record(new_device(None), NewAuth::Token("T")).unwrap();
        assert_ne!(a.device_id, b.device_id);
        assert!(uuid::Uuid::parse_str(&a.device_id).is_ok());
    }

    #[test]
    fn empty_vendor_is_rejected() {
        let mut device = new_device(Some("D3"));
        device.vendor.clear();
        assert!(build_record(device, NewAuth::Token("T")).is_err());
    }

    #[test]
    fn summary_has_no_credential_material() {
        let record = secret_device("D1", "10.0.0.5", "juniper", "netops", "CIPHERTEXT", "SALT");
        let summary = device_summary(&record);
        let text = summary.to_string();
        assert_eq!(summary["auth_type"], AuthType::Secret.to_string());
        assert!(!text.contains("netops"));
        assert!(!text.contains("CIPHERTEXT"));
        assert!(!text.contains("SALT"));
    }
}

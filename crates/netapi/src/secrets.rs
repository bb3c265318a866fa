// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `netapi encrypt` and `netapi decrypt` command implementation.

use std::io::{BufRead, IsTerminal};

use netapi_config::model::NetApiConfig;
use netapi_core::NetApiError;
use netapi_vault::{mask_secret, SealedSecret, SecretCodec};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

/// Build a codec from the master passphrase and the configured KDF cost.
///
/// `confirm` asks for the passphrase twice on a TTY; use it before sealing.
pub fn open_codec(config: &NetApiConfig, confirm: bool) -> Result<SecretCodec, NetApiError> {
    let master = if confirm {
        netapi_vault::get_master_passphrase_with_confirm()?
    } else {
        netapi_vault::get_master_passphrase()?
    };
    SecretCodec::new(master).with_iterations(config.vault.kdf_iterations)
}

/// Read a device secret: prompted twice on a TTY, one line from stdin otherwise.
pub fn read_device_secret(label: &str) -> Result<Zeroizing<String>, NetApiError> {
    let read_err = |e: std::io::Error| NetApiError::Vault(format!("failed to read {label}: {e}"));

    let value = if std::io::stdin().is_terminal() {
        let first = Zeroizing::new(rpassword::prompt_password(format!("Device {label}: ")).map_err(read_err)?);
        let second = Zeroizing::new(
            rpassword::prompt_password(format!("Confirm device {label}: ")).map_err(read_err)?,
        );
        if *first != *second {
            return Err(NetApiError::Vault(format!("{label}s do not match")));
        }
        first
    } else {
        let mut line = Zeroizing::new(String::new());
        std::io::stdin().lock().read_line(&mut line).map_err(read_err)?;
        Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string())
    };

    if value.is_empty() {
        return Err(NetApiError::Vault(format!("empty {label} not allowed")));
    }
    Ok(value)
}

fn sealed_output(sealed: &SealedSecret, json: bool) -> String {
    if json {
        serde_json::json!({
            "ciphertext": sealed.ciphertext,
            "salt": sealed.salt,
        })
        .to_string()
    } else {
        format!("ciphertext: {}\nsalt:       {}", sealed.ciphertext, sealed.salt)
    }
}

/// Run the `netapi encrypt` command.
pub fn run_encrypt(config: &NetApiConfig, json: bool) -> Result<(), NetApiError> {
    let codec = open_codec(config, true)?;
    let password = read_device_secret("password")?;
    let sealed = codec.encrypt(&password)?;
    println!("{}", sealed_output(&sealed, json));
    Ok(())
}

/// Run the `netapi decrypt` command.
///
/// Only a masked preview is printed; the plaintext never reaches the terminal.
pub async fn run_decrypt(
    config: &NetApiConfig,
    ciphertext: &str,
    salt: &str,
) -> Result<(), NetApiError> {
    let codec = open_codec(config, false)?;
    let (ciphertext, salt) = (ciphertext.to_string(), salt.to_string());
    let plaintext = tokio::task::spawn_blocking(move || codec.decrypt(&ciphertext, &salt))
        .await
        .map_err(|e| NetApiError::Internal(format!("decrypt task failed: {e}")))??;

    let preview = mask_secret(plaintext.expose_secret());
    println!(
        "decrypted {} characters: {preview}",
        plaintext.expose_secret().chars().count()
    );
    Ok(())
}

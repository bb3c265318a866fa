// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase acquisition via NETAPI_MASTER_PW or a TTY prompt.

use netapi_core::NetApiError;
use secrecy::SecretString;

/// The environment variable holding the master passphrase.
pub const MASTER_PW_ENV_VAR: &str = "NETAPI_MASTER_PW";

fn from_env() -> Option<SecretString> {
    std::env::var(MASTER_PW_ENV_VAR)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(SecretString::from)
}

fn read_tty(prompt: &str) -> Result<String, NetApiError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| NetApiError::Vault(format!("failed to read passphrase: {e}")))
}

fn missing() -> NetApiError {
    NetApiError::Vault(format!(
        "no master passphrase provided. Set {MASTER_PW_ENV_VAR} or run interactively."
    ))
}

/// Get the master passphrase from the environment or an interactive prompt.
///
/// Priority:
/// 1. `NETAPI_MASTER_PW` (for services and scripts)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_master_passphrase() -> Result<SecretString, NetApiError> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let passphrase = read_tty("Master passphrase: ")?;
        if passphrase.is_empty() {
            return Err(NetApiError::Vault("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(passphrase));
    }

    Err(missing())
}

/// Like [`get_master_passphrase`], but the prompt asks twice.
///
/// Used before sealing new secrets, where a mistyped passphrase would produce
/// ciphertext nobody can open. The env var needs no confirmation.
pub fn get_master_passphrase_with_confirm() -> Result<SecretString, NetApiError> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = zeroize::Zeroizing::new(read_tty("Master passphrase: ")?);
        let second = zeroize::Zeroizing::new(read_tty("Confirm master passphrase: ")?);

        if *first != *second {
            return Err(NetApiError::Vault("passphrases do not match".to_string()));
        }
        if first.is_empty() {
            return Err(NetApiError::Vault("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(first.to_string()));
    }

    Err(missing())
}

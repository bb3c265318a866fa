// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the vault, the store, and the plugin dispatcher.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Opaque structured result returned by a vendor plugin.
pub type Payload = serde_json::Value;

/// A device query operation that every vendor plugin implements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    DeviceInfo,
    Hardware,
    Interfaces,
    LldpNeighbors,
    MacTable,
    OspfState,
    RoutingTable,
    Vlans,
}

impl Capability {
    /// Remote procedure name invoked on the plugin for this capability.
    pub fn remote_method(self) -> &'static str {
        match self {
            Capability::DeviceInfo => "device",
            Capability::Hardware => "hardware",
            Capability::Interfaces => "interfaces",
            Capability::LldpNeighbors => "lldp",
            Capability::MacTable => "mac",
            Capability::OspfState => "ospf",
            Capability::RoutingTable => "routing",
            Capability::Vlans => "vlans",
        }
    }
}

/// The credential scheme for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Username plus an encrypted secret.
    Secret,
    /// Opaque token stored as-is.
    Token,
}

/// Stored authentication material for a device.
///
/// Exactly one shape is populated, matching the device's auth type.
#[derive(Clone, PartialEq, Eq)]
pub enum DeviceAuth {
    /// Username with a vault-encrypted secret and its salt.
    Secret {
        username: String,
        ciphertext: String,
        salt: String,
    },
    /// Opaque token, not encrypted by the vault.
    Token { token: String },
}

impl DeviceAuth {
    pub fn auth_type(&self) -> AuthType {
        match self {
            DeviceAuth::Secret { .. } => AuthType::Secret,
            DeviceAuth::Token { .. } => AuthType::Token,
        }
    }
}

impl std::fmt::Debug for DeviceAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceAuth::Secret { ciphertext, .. } => f
                .debug_struct("Secret")
                .field("username", &"[REDACTED]")
                .field("ciphertext_len", &ciphertext.len())
                .finish(),
            DeviceAuth::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// A device record as held by the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub device_id: String,
    /// Network address handed to the plugin.
    pub host: String,
    /// Vendor key used to select a plugin (exact match).
    pub vendor: String,
    pub name: Option<String>,
    pub site: Option<String>,
    pub device_type: Option<String>,
    pub auth: DeviceAuth,
}

/// Ready-to-use authentication material for a single dispatch call.
///
/// Secret values zeroize on drop and never appear in `Debug` output.
pub enum Credential {
    Secret {
        username: String,
        secret: SecretString,
    },
    Token(SecretString),
}

impl Credential {
    pub fn auth_type(&self) -> AuthType {
        match self {
            Credential::Secret { .. } => AuthType::Secret,
            Credential::Token(_) => AuthType::Token,
        }
    }

    /// Borrow this credential in the calling convention of its auth type.
    pub fn call_auth(&self) -> CallAuth<'_> {
        match self {
            Credential::Secret { username, secret } => CallAuth::Secret {
                username: username.as_str(),
                secret: secret.expose_secret(),
            },
            Credential::Token(token) => CallAuth::Token(token.expose_secret()),
        }
    }

    /// Values that must be scrubbed from any log line or error detail.
    pub fn sensitive_values(&self) -> Vec<&str> {
        match self {
            Credential::Secret { username, secret } => {
                vec![username.as_str(), secret.expose_secret()]
            }
            Credential::Token(token) => vec![token.expose_secret()],
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("auth_type", &self.auth_type())
            .finish_non_exhaustive()
    }
}

/// Authentication arguments for one remote call.
///
/// The two variants are the only calling conventions a plugin accepts;
/// username/secret arguments are never mixed with a token.
#[derive(Clone, Copy)]
pub enum CallAuth<'a> {
    Secret { username: &'a str, secret: &'a str },
    Token(&'a str),
}

impl std::fmt::Debug for CallAuth<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallAuth::Secret { .. } => write!(f, "CallAuth::Secret([REDACTED])"),
            CallAuth::Token(_) => write!(f, "CallAuth::Token([REDACTED])"),
        }
    }
}

/// The device a remote call is aimed at, with its credentials.
#[derive(Debug, Clone, Copy)]
pub struct CallTarget<'a> {
    pub host: &'a str,
    pub auth: CallAuth<'a>,
}

/// Failure classification surfaced by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum ErrorKind {
    DeviceNotFound,
    NoPluginForVendor,
    DecryptFailed,
    ConnectionRefused,
    PluginError,
    StoreUnavailable,
}

impl ErrorKind {
    /// HTTP status the surrounding gateway uses for this kind.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::DeviceNotFound | ErrorKind::NoPluginForVendor => 400,
            ErrorKind::DecryptFailed => 500,
            ErrorKind::ConnectionRefused | ErrorKind::PluginError => 502,
            ErrorKind::StoreUnavailable => 503,
        }
    }
}

/// Typed failure returned by the dispatcher instead of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

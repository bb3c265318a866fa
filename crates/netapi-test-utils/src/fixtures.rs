// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device record builders.

use netapi_core::{DeviceAuth, DeviceRecord};

/// A secret-auth device. `ciphertext` and `salt` are stored as given.
pub fn secret_device(
    device_id: &str,
    host: &str,
    vendor: &str,
    username: &str,
    ciphertext: &str,
    salt: &str,
) -> DeviceRecord {
    DeviceRecord {
        device_id: device_id.to_string(),
        host: host.to_string(),
        vendor: vendor.to_string(),
        name: None,
        site: None,
        device_type: None,
        auth: DeviceAuth::Secret {
            username: username.to_string(),
            ciphertext: ciphertext.to_string(),
            salt: salt.to_string(),
        },
    }
}

/// A token-auth device.
pub fn token_device(device_id: &str, host: &str, vendor: &str, token: &str) -> DeviceRecord {
    DeviceRecord {
        device_id: device_id.to_string(),
        host: host.to_string(),
        vendor: vendor.to_string(),
        name: None,
        site: None,
        device_type: None,
        auth: DeviceAuth::Token {
            token: token.to_string(),
        },
    }
}

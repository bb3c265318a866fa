// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Net-API credential vault and plugin dispatcher.
//!
//! This crate provides the shared error type, the device and credential
//! types, and the two trait seams (`DeviceStore`, `VendorPlugin`) that the
//! rest of the workspace is built around.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NetApiError;
pub use traits::plugin::call_capability;
pub use traits::{DeviceStore, VendorPlugin};
pub use types::{
    AuthType, CallAuth, CallTarget, Capability, Credential, DeviceAuth, DeviceRecord,
    ErrorEnvelope, ErrorKind, Payload,
};

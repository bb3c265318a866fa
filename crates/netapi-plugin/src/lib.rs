// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendor plugin registry and capability dispatcher.
//!
//! Each configured `[[plugins]]` entry becomes a [`PluginHandle`]: a
//! long-lived JSON-RPC client plus a permit pool bounding in-flight calls.
//! [`PluginDispatcher`] resolves a device's credentials, routes the
//! requested capability to the device vendor's handle, and classifies the
//! outcome into an [`ErrorEnvelope`](netapi_core::ErrorEnvelope).

pub mod client;
pub mod dispatcher;
pub mod registry;

pub use client::JsonRpcPluginClient;
pub use dispatcher::{DispatchTimeouts, PluginDispatcher};
pub use registry::{PluginHandle, PluginRegistry};

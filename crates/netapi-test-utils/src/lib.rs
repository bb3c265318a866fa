// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Net-API integration tests.
//!
//! Provides in-memory adapters for fast, deterministic tests that need
//! neither a database nor a running vendor plugin.
//!
//! # Components
//!
//! - [`MemoryDeviceStore`] - `DeviceStore` backed by a map, with fault injection
//! - [`MockPlugin`] - `VendorPlugin` that records every call it receives
//! - [`fixtures`] - device record builders

pub mod fixtures;
pub mod mock_plugin;
pub mod mock_store;

pub use mock_plugin::{MockPlugin, RecordedAuth, RecordedCall};
pub use mock_store::MemoryDeviceStore;

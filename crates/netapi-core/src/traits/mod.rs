// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the dispatcher and its external collaborators.
//!
//! Both traits use `#[async_trait]` so implementations can be held as
//! `Arc<dyn ...>` and swapped for in-memory fakes in tests.

pub mod plugin;
pub mod store;

pub use plugin::VendorPlugin;
pub use store::DeviceStore;

// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read contract for the external device store.

use async_trait::async_trait;

use crate::error::NetApiError;
use crate::types::DeviceRecord;

/// Single-row device lookup consumed by the resolver and the dispatcher.
#[async_trait]
pub trait DeviceStore: Send + Sync + 'static {
    /// Human-readable name of the backing store, for logs.
    fn name(&self) -> &str;

    /// Fetch one device by identifier. `Ok(None)` means no such device.
    async fn fetch_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, NetApiError>;
}

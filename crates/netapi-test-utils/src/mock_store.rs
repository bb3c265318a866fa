// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory device store for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use netapi_core::{DeviceRecord, DeviceStore, NetApiError};

/// A `DeviceStore` holding records in a map.
///
/// Counts every fetch, and can be told to stall or to fail so callers can
/// exercise their timeout and store-error paths.
#[derive(Default)]
pub struct MemoryDeviceStore {
    devices: Arc<Mutex<HashMap<String, DeviceRecord>>>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
    failing: AtomicBool,
}

impl MemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with the given records.
    pub fn with_devices(records: impl IntoIterator<Item = DeviceRecord>) -> Self {
        let devices = records
            .into_iter()
            .map(|r| (r.device_id.clone(), r))
            .collect();
        Self {
            devices: Arc::new(Mutex::new(devices)),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every subsequent fetch return a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn insert(&self, record: DeviceRecord) {
        self.devices
            .lock()
            .await
            .insert(record.device_id.clone(), record);
    }

    /// Number of `fetch_device` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, NetApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(NetApiError::Storage {
                source: "memory store set to fail".into(),
            });
        }
        Ok(self.devices.lock().await.get(device_id).cloned())
    }
}

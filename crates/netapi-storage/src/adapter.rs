// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DeviceStore trait.

use async_trait::async_trait;
use tracing::debug;

use netapi_config::model::StorageConfig;
use netapi_core::{DeviceRecord, DeviceStore, NetApiError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed device store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The operator CLI uses the write operations; the dispatcher only reads.
pub struct SqliteDeviceStore {
    db: Database,
}

impl SqliteDeviceStore {
    /// Open the database named by `config`, applying migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, NetApiError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite device store initialized");
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn insert_device(&self, record: &DeviceRecord) -> Result<(), NetApiError> {
        queries::devices::insert_device(&self.db, record).await
    }

    pub async fn get_device(&self, id: &str) -> Result<Option<DeviceRecord>, NetApiError> {
        queries::devices::get_device(&self.db, id).await
    }

    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, NetApiError> {
        queries::devices::list_devices(&self.db).await
    }

    pub async fn update_device_secret(
        &self,
        id: &str,
        username: &str,
        ciphertext: &str,
        salt: &str,
    ) -> Result<(), NetApiError> {
        queries::devices::update_device_secret(&self.db, id, username, ciphertext, salt).await
    }

    pub async fn delete_device(&self, id: &str) -> Result<bool, NetApiError> {
        queries::devices::delete_device(&self.db, id).await
    }

    /// Checkpoint the WAL before the process exits.
    pub async fn close(&self) -> Result<(), NetApiError> {
        self.db.checkpoint().await
    }
}

#[async_trait]
impl DeviceStore for SqliteDeviceStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, NetApiError> {
        self.get_device(device_id).await
    }
}

// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device CRUD operations.

use netapi_core::{DeviceAuth, DeviceRecord, NetApiError};
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};

const DEVICE_COLUMNS: &str =
    "id, host, vendor, name, site, device_type, auth_type, username, secret, salt, token";

/// A `devices` row as stored, before the auth invariant is checked.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: String,
    pub host: String,
    pub vendor: String,
    pub name: Option<String>,
    pub site: Option<String>,
    pub device_type: Option<String>,
    pub auth_type: String,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub salt: Option<String>,
    pub token: Option<String>,
}

impl DeviceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            host: row.get(1)?,
            vendor: row.get(2)?,
            name: row.get(3)?,
            site: row.get(4)?,
            device_type: row.get(5)?,
            auth_type: row.get(6)?,
            username: row.get(7)?,
            secret: row.get(8)?,
            salt: row.get(9)?,
            token: row.get(10)?,
        })
    }

    /// Check the auth invariant and build the typed record.
    ///
    /// Exactly one of (`username`, `secret`, `salt`) or (`token`) must be
    /// populated, matching `auth_type`. Anything else is a storage error.
    pub fn into_record(self) -> Result<DeviceRecord, NetApiError> {
        let auth = match (
            self.auth_type.as_str(),
            self.username,
            self.secret,
            self.salt,
            self.token,
        ) {
            ("secret", Some(username), Some(ciphertext), Some(salt), None) => DeviceAuth::Secret {
                username,
                ciphertext,
                salt,
            },
            ("token", None, None, None, Some(token)) => DeviceAuth::Token { token },
            (auth_type, ..) => {
                return Err(NetApiError::Storage {
                    source: format!(
                        "device `{}` has inconsistent auth material for auth_type `{auth_type}`",
                        self.id
                    )
                    .into(),
                });
            }
        };

        Ok(DeviceRecord {
            device_id: self.id,
            host: self.host,
            vendor: self.vendor,
            name: self.name,
            site: self.site,
            device_type: self.device_type,
            auth,
        })
    }
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(record: &DeviceRecord) -> Self {
        let mut row = DeviceRow {
            id: record.device_id.clone(),
            host: record.host.clone(),
            vendor: record.vendor.clone(),
            name: record.name.clone(),
            site: record.site.clone(),
            device_type: record.device_type.clone(),
            auth_type: record.auth.auth_type().to_string(),
            ..DeviceRow::default()
        };
        match &record.auth {
            DeviceAuth::Secret {
                username,
                ciphertext,
                salt,
            } => {
                row.username = Some(username.clone());
                row.secret = Some(ciphertext.clone());
                row.salt = Some(salt.clone());
            }
            DeviceAuth::Token { token } => row.token = Some(token.clone()),
        }
        row
    }
}

/// Insert a new device.
pub async fn insert_device(db: &Database, record: &DeviceRecord) -> Result<(), NetApiError> {
    let row = DeviceRow::from(record);
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO devices (id, host, vendor, name, site, device_type, auth_type,
                                      username, secret, salt, token)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    row.id,
                    row.host,
                    row.vendor,
                    row.name,
                    row.site,
                    row.device_type,
                    row.auth_type,
                    row.username,
                    row.secret,
                    row.salt,
                    row.token,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a device by ID.
pub async fn get_device(db: &Database, id: &str) -> Result<Option<DeviceRecord>, NetApiError> {
    let id = id.to_string();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<DeviceRow>, rusqlite::Error> {
            let mut stmt =
                conn.prepare(&format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = ?1"))?;
            match stmt.query_row(params![id], DeviceRow::from_row) {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    row.map(DeviceRow::into_record).transpose()
}

/// List all devices ordered by ID.
pub async fn list_devices(db: &Database) -> Result<Vec<DeviceRecord>, NetApiError> {
    let rows = db
        .connection()
        .call(|conn| -> Result<Vec<DeviceRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id"))?;
            let rows = stmt.query_map([], DeviceRow::from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter().map(DeviceRow::into_record).collect()
}

/// Replace the sealed secret (and username) of a secret-auth device.
///
/// Token devices are left untouched and reported as not found.
pub async fn update_device_secret(
    db: &Database,
    id: &str,
    username: &str,
    ciphertext: &str,
    salt: &str,
) -> Result<(), NetApiError> {
    let (device_id, username, ciphertext, salt) = (
        id.to_string(),
        username.to_string(),
        ciphertext.to_string(),
        salt.to_string(),
    );
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE devices
                 SET username = ?2, secret = ?3, salt = ?4,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND auth_type = 'secret'",
                params![device_id, username, ciphertext, salt],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if updated == 0 {
        return Err(NetApiError::DeviceNotFound {
            device_id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete a device. Returns whether a row was removed.
pub async fn delete_device(db: &Database, id: &str) -> Result<bool, NetApiError> {
    let id = id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM devices WHERE id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netapi_test_utils::fixtures::{secret_device, token_device};

    #[tokio::test]
    async fn insert_and_get_secret_device() {
        let db = Database::open_in_memory().await.unwrap();
        let mut record = secret_device("D1", "10.0.0.5", "juniper", "netops", "CT", "SALT");
        record.site = Some("ams1".to_string());
        insert_device(&db, &record).await.unwrap();

        let fetched = get_device(&db, "D1").await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn get_missing_device_is_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_device(&db, "D9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        let record = token_device("D2", "10.0.0.9", "cisco", "T");
        insert_device(&db, &record).await.unwrap();
        assert!(insert_device(&db, &record).await.is_err());
    }

    #[tokio::test]
    async fn list_devices_sorted_by_id() {
        let db = Database::open_in_memory().await.unwrap();
        insert_device(&db, &token_device("D2", "h2", "cisco", "T")).await.unwrap();
        insert_device(&db, &secret_device("D1", "h1", "juniper", "u", "c", "s"))
            .await
            .unwrap();

        let ids: Vec<String> = list_devices(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.device_id)
            .collect();
        assert_eq!(ids, vec!["D1", "D2"]);
    }

    #[tokio::test]
    async fn update_secret_rotates_material() {
        let db = Database::open_in_memory().await.unwrap();
        insert_device(&db, &secret_device("D1", "h", "juniper", "u", "old-ct", "old-salt"))
            .await
            .unwrap();

        update_device_secret(&db, "D1", "u2", "new-ct", "new-salt")
            .await
            .unwrap();
        let fetched = get_device(&db, "D1").await.unwrap().unwrap();
        assert_eq!(
            fetched.auth,
            DeviceAuth::Secret {
                username: "u2".to_string(),
                ciphertext: "new-ct".to_string(),
                salt: "new-salt".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn update_secret_on_token_device_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        insert_device(&db, &token_device("D2", "h", "cisco", "T")).await.unwrap();
        assert!(matches!(
            update_device_secret(&db, "D2", "u", "c", "s").await,
            Err(NetApiError::DeviceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_device_reports_removal() {
        let db = Database::open_in_memory().await.unwrap();
        insert_device(&db, &token_device("D2", "h", "cisco", "T")).await.unwrap();
        assert!(delete_device(&db, "D2").await.unwrap());
        assert!(!delete_device(&db, "D2").await.unwrap());
        assert!(get_device(&db, "D2").await.unwrap().is_none());
    }

    #[test]
    fn row_with_mixed_auth_is_a_storage_error() {
        let row = DeviceRow {
            id: "D1".to_string(),
            host: "h".to_string(),
            vendor: "juniper".to_string(),
            auth_type: "secret".to_string(),
            username: Some("u".to_string()),
            secret: Some("c".to_string()),
            salt: Some("s".to_string()),
            token: Some("T".to_string()),
            ..DeviceRow::default()
        };
        assert!(matches!(row.into_record(), Err(NetApiError::Storage { .. })));
    }

    #[test]
    fn row_with_missing_salt_is_a_storage_error() {
        let row = DeviceRow {
            id: "D1".to_string(),
            auth_type: "secret".to_string(),
            username: Some("u".to_string()),
            secret: Some("c".to_string()),
            ..DeviceRow::default()
        };
        assert!(row.into_record().is_err());
    }

    #[test]
    fn row_with_unknown_auth_type_is_a_storage_error() {
        let row = DeviceRow {
            id: "D1".to_string(),
            auth_type: "kerberos".to_string(),
            token: Some("T".to_string()),
            ..DeviceRow::default()
        };
        let err = row.into_record().unwrap_err();
        assert!(err.to_string().contains("kerberos"));
    }
}

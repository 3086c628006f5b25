//! Named store management: open, enumerate, delete.
//!
//! Deleting a store removes its entries through the foreign key cascade.

use super::connection::CacheDb;
use super::entries::Store;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// Summary of one store for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub name: String,
    pub created_at: String,
    pub entries: u64,
    pub body_bytes: u64,
}

impl CacheDb {
    /// Open the store called `name`, creating it if it does not exist.
    pub async fn open_store(&self, name: &str) -> Result<Store, Error> {
        if name.is_empty() {
            return Err(Error::InvalidInput("store name must not be empty".to_string()));
        }
        let owned = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
                    params![owned, now],
                )
            })
            .await
            .map_err(Error::from)?;

        Ok(Store::new(self.clone(), name.to_string()))
    }

    /// Handle to the store called `name` without creating it.
    ///
    /// Lookups on a store that does not exist simply miss.
    pub fn store(&self, name: &str) -> Store {
        Store::new(self.clone(), name.to_string())
    }

    /// Names of all stores, oldest first.
    pub async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY rowid")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a store and every entry in it.
    ///
    /// Returns false if no such store existed.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| conn.execute("DELETE FROM caches WHERE name = ?1", params![name]))
            .await
            .map(|count| count > 0)
            .map_err(Error::from)
    }

    /// Per-store entry counts and body sizes, oldest store first.
    pub async fn store_stats(&self) -> Result<Vec<StoreStats>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<StoreStats>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT c.name, c.created_at, COUNT(e.key), COALESCE(SUM(LENGTH(e.body)), 0)
                     FROM caches c LEFT JOIN entries e ON e.cache_name = c.name
                     GROUP BY c.name
                     ORDER BY c.rowid",
                )?;
                let stats = stmt
                    .query_map([], |row| {
                        Ok(StoreStats {
                            name: row.get(0)?,
                            created_at: row.get(1)?,
                            entries: row.get::<_, i64>(2)? as u64,
                            body_bytes: row.get::<_, i64>(3)? as u64,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }
}

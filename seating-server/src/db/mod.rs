//! Storage Module
//!
//! One [`SeatingStore`] contract, four interchangeable backends:
//!
//! | Backend | Type | Layout |
//! |---------|------|--------|
//! | memory | [`MemoryStore`] | two in-process maps |
//! | json | [`JsonFileStore`] | `data/guests.json` + `data/tables.json` |
//! | redb | [`RedbStore`] | `data/seating.redb`, one JSON blob per record |
//! | sqlite | [`SqliteStore`] | `data/seating.db`, relational schema |

pub mod json_file;
pub mod kv;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use json_file::JsonFileStore;
pub use kv::RedbStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{SeatingStore, StoreError, StoreResult, occupancy};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::Config;

/// Which backend to open at startup (`STORAGE_BACKEND`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Json,
    Redb,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Json => "json",
            StorageBackend::Redb => "redb",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "json" | "file" => Ok(StorageBackend::Json),
            "redb" | "kv" => Ok(StorageBackend::Redb),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Open the configured backend under `work_dir/data`
pub async fn open_store(config: &Config) -> StoreResult<Arc<dyn SeatingStore>> {
    let data_dir = config.data_dir();
    let store: Arc<dyn SeatingStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Json => Arc::new(JsonFileStore::open(&data_dir).await?),
        StorageBackend::Redb => {
            tokio::fs::create_dir_all(&data_dir).await?;
            Arc::new(RedbStore::open(data_dir.join("seating.redb"))?)
        }
        StorageBackend::Sqlite => {
            tokio::fs::create_dir_all(&data_dir).await?;
            Arc::new(SqliteStore::open(data_dir.join("seating.db")).await?)
        }
    };

    tracing::info!(backend = store.backend(), dir = %data_dir.display(), "Storage opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("SQLite".parse::<StorageBackend>(), Ok(StorageBackend::Sqlite));
        assert_eq!("json".parse::<StorageBackend>(), Ok(StorageBackend::Json));
        assert_eq!(" redb ".parse::<StorageBackend>(), Ok(StorageBackend::Redb));
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[tokio::test]
    async fn test_open_each_backend() {
        for backend in [
            StorageBackend::Memory,
            StorageBackend::Json,
            StorageBackend::Redb,
            StorageBackend::Sqlite,
        ] {
            let dir = tempfile::tempdir().unwrap();
            let config = Config::with_overrides(dir.path().to_string_lossy(), 0, backend);
            let store = open_store(&config).await.unwrap();
            assert_eq!(store.backend(), backend.as_str());
            store.ping().await.unwrap();
        }
    }
}

//! JSON file backend
//!
//! Each collection is one JSON array (`guests.json`, `tables.json`) that is
//! read whole and rewritten whole. Writes go to a temp file first and are
//! renamed into place so a crash never leaves a half-written collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Guest, Table};
use tokio::sync::Mutex;

use super::store::{SeatingStore, StoreResult, sort_guests, sort_tables};

const GUESTS_FILE: &str = "guests.json";
const TABLES_FILE: &str = "tables.json";

/// Whole-collection JSON files under one directory
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the files
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating the directory and empty collections if missing
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        for name in [GUESTS_FILE, TABLES_FILE] {
            let path = dir.join(name);
            if !tokio::fs::try_exists(&path).await? {
                write_atomic(&path, b"[]").await?;
                tracing::info!(file = %path.display(), "Created empty collection");
            }
        }

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    async fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Vec<T>> {
        let bytes = tokio::fs::read(self.dir.join(name)).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn store<T: Serialize>(&self, name: &str, items: &[T]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        write_atomic(&self.dir.join(name), &bytes).await
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl SeatingStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
        let mut guests: Vec<Guest> = self.load(GUESTS_FILE).await?;
        sort_guests(&mut guests);
        Ok(guests)
    }

    async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>> {
        let guests: Vec<Guest> = self.load(GUESTS_FILE).await?;
        Ok(guests.into_iter().find(|g| g.id == id))
    }

    async fn save_guest(&self, guest: &Guest) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut guests: Vec<Guest> = self.load(GUESTS_FILE).await?;
        match guests.iter_mut().find(|g| g.id == guest.id) {
            Some(existing) => *existing = guest.clone(),
            None => guests.push(guest.clone()),
        }
        self.store(GUESTS_FILE, &guests).await
    }

    async fn delete_guest(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut guests: Vec<Guest> = self.load(GUESTS_FILE).await?;
        let before = guests.len();
        guests.retain(|g| g.id != id);
        if guests.len() == before {
            return Ok(false);
        }
        self.store(GUESTS_FILE, &guests).await?;
        Ok(true)
    }

    async fn list_tables(&self) -> StoreResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.load(TABLES_FILE).await?;
        sort_tables(&mut tables);
        Ok(tables)
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<Table>> {
        let tables: Vec<Table> = self.load(TABLES_FILE).await?;
        Ok(tables.into_iter().find(|t| t.id == id))
    }

    async fn save_table(&self, table: &Table) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut tables: Vec<Table> = self.load(TABLES_FILE).await?;
        match tables.iter_mut().find(|t| t.id == table.id) {
            Some(existing) => *existing = table.clone(),
            None => tables.push(table.clone()),
        }
        self.store(TABLES_FILE, &tables).await
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut tables: Vec<Table> = self.load(TABLES_FILE).await?;
        let before = tables.len();
        tables.retain(|t| t.id != id);
        if tables.len() == before {
            return Ok(false);
        }
        self.store(TABLES_FILE, &tables).await?;
        Ok(true)
    }

    /// One read of each file and one write of `tables.json`
    async fn recompute_table_counts(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let guests: Vec<Guest> = self.load(GUESTS_FILE).await?;
        let mut tables: Vec<Table> = self.load(TABLES_FILE).await?;
        for table in tables.iter_mut() {
            table.current_count = super::store::occupancy(&guests, &table.id, None);
        }
        self.store(TABLES_FILE, &tables).await
    }

    async fn ping(&self) -> StoreResult<()> {
        tokio::fs::metadata(self.dir.join(GUESTS_FILE)).await?;
        tokio::fs::metadata(self.dir.join(TABLES_FILE)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::fixtures::{guest, table};

    #[tokio::test]
    async fn test_open_creates_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).await.unwrap();

        assert!(store.list_guests().await.unwrap().is_empty());
        assert!(store.list_tables().await.unwrap().is_empty());
        assert!(dir.path().join("data/guests.json").exists());
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_roundtrip_and_persistence() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).await.unwrap();
            store.save_table(&table("t1", 1, 10)).await.unwrap();
            store.save_guest(&guest("g1", "Zoé", "t1", 2, 1)).await.unwrap();
            store.recompute_table_counts().await.unwrap();
        }

        let reopened = JsonFileStore::open(dir.path()).await.unwrap();
        let table = reopened.get_table("t1").await.unwrap().unwrap();
        assert_eq!(table.current_count, 3);
        assert_eq!(reopened.get_guest("g1").await.unwrap().unwrap().name, "Zoé");
        assert!(!dir.path().join("guests.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store.save_guest(&guest("g1", "A", "t1", 1, 0)).await.unwrap();

        assert!(store.delete_guest("g1").await.unwrap());
        assert!(!store.delete_guest("g1").await.unwrap());
        assert!(store.get_guest("g1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join(GUESTS_FILE), b"{not json")
            .await
            .unwrap();

        assert!(matches!(
            store.list_guests().await,
            Err(crate::db::StoreError::Serialization(_))
        ));
    }
}

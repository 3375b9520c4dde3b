//! redb-based key-value backend

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Guest, Table};

use super::store::{SeatingStore, StoreError, StoreResult, occupancy, sort_guests, sort_tables};

type RecordTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Guests table: key = guest id, value = JSON
const GUESTS_TABLE: RecordTable = TableDefinition::new("guests");

/// Seating tables table: key = table id, value = JSON
const TABLES_TABLE: RecordTable = TableDefinition::new("tables");

/// One redb file, one JSON blob per record
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(GUESTS_TABLE)?;
            let _ = write_txn.open_table(TABLES_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_all<T: serde::de::DeserializeOwned>(
        &self,
        def: RecordTable,
    ) -> StoreResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_, guard) = result?;
            items.push(serde_json::from_slice(guard.value())?);
        }
        Ok(items)
    }

    fn read_one<T: serde::de::DeserializeOwned>(
        &self,
        def: RecordTable,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;

        match table.get(id)? {
            Some(guard) => {
                let item = serde_json::from_slice(guard.value()).map_err(|e| {
                    StoreError::Corrupted {
                        id: id.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn write_one<T: serde::Serialize>(
        &self,
        def: RecordTable,
        id: &str,
        item: &T,
    ) -> StoreResult<()> {
        let value = serde_json::to_vec(item)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(def)?;
            table.insert(id, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove_one(&self, def: RecordTable, id: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(def)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

#[async_trait]
impl SeatingStore for RedbStore {
    fn backend(&self) -> &'static str {
        "redb"
    }

    async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
        let mut guests: Vec<Guest> = self.read_all(GUESTS_TABLE)?;
        sort_guests(&mut guests);
        Ok(guests)
    }

    async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>> {
        self.read_one(GUESTS_TABLE, id)
    }

    async fn save_guest(&self, guest: &Guest) -> StoreResult<()> {
        self.write_one(GUESTS_TABLE, &guest.id, guest)
    }

    async fn delete_guest(&self, id: &str) -> StoreResult<bool> {
        self.remove_one(GUESTS_TABLE, id)
    }

    async fn list_tables(&self) -> StoreResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.read_all(TABLES_TABLE)?;
        sort_tables(&mut tables);
        Ok(tables)
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<Table>> {
        self.read_one(TABLES_TABLE, id)
    }

    async fn save_table(&self, table: &Table) -> StoreResult<()> {
        self.write_one(TABLES_TABLE, &table.id, table)
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        self.remove_one(TABLES_TABLE, id)
    }

    /// Reads guests and rewrites every table inside one write transaction
    async fn recompute_table_counts(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let guests_table = write_txn.open_table(GUESTS_TABLE)?;
            let mut guests: Vec<Guest> = Vec::new();
            for result in guests_table.iter()? {
                let (_, guard) = result?;
                guests.push(serde_json::from_slice(guard.value())?);
            }

            let mut tables_table = write_txn.open_table(TABLES_TABLE)?;
            let mut tables: Vec<Table> = Vec::new();
            for result in tables_table.iter()? {
                let (_, guard) = result?;
                tables.push(serde_json::from_slice(guard.value())?);
            }

            for mut table in tables {
                let count = occupancy(&guests, &table.id, None);
                if table.current_count != count {
                    table.current_count = count;
                    let value = serde_json::to_vec(&table)?;
                    tables_table.insert(table.id.as_str(), value.as_slice())?;
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(TABLES_TABLE)?;
        Ok(())
    }
}

//! In-memory backend (tests and throwaway sessions)

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Guest, Table};
use tokio::sync::RwLock;

use super::store::{SeatingStore, StoreResult, sort_guests, sort_tables};

/// Guests and tables held in two maps keyed by id
#[derive(Debug, Default)]
pub struct MemoryStore {
    guests: RwLock<HashMap<String, Guest>>,
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatingStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
        let mut guests: Vec<Guest> = self.guests.read().await.values().cloned().collect();
        sort_guests(&mut guests);
        Ok(guests)
    }

    async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>> {
        Ok(self.guests.read().await.get(id).cloned())
    }

    async fn save_guest(&self, guest: &Guest) -> StoreResult<()> {
        self.guests
            .write()
            .await
            .insert(guest.id.clone(), guest.clone());
        Ok(())
    }

    async fn delete_guest(&self, id: &str) -> StoreResult<bool> {
        Ok(self.guests.write().await.remove(id).is_some())
    }

    async fn list_tables(&self) -> StoreResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.tables.read().await.values().cloned().collect();
        sort_tables(&mut tables);
        Ok(tables)
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<Table>> {
        Ok(self.tables.read().await.get(id).cloned())
    }

    async fn save_table(&self, table: &Table) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .insert(table.id.clone(), table.clone());
        Ok(())
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove(id).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::fixtures::{guest, table};

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let store = MemoryStore::new();
        store.save_guest(&guest("g1", "Alice", "t1", 1, 0)).await.unwrap();
        store.save_guest(&guest("g1", "Alice B.", "t1", 2, 0)).await.unwrap();

        let guests = store.list_guests().await.unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].name, "Alice B.");
    }

    #[tokio::test]
    async fn test_default_recompute() {
        let store = MemoryStore::new();
        store.save_table(&table("t1", 1, 10)).await.unwrap();
        store.save_table(&table("t2", 2, 10)).await.unwrap();
        store.save_guest(&guest("g1", "A", "t1", 6, 2)).await.unwrap();

        store.recompute_table_counts().await.unwrap();
        store.recompute_table_counts().await.unwrap();

        let tables = store.list_tables().await.unwrap();
        assert_eq!(tables[0].current_count, 8);
        assert_eq!(tables[1].current_count, 0);
        assert_eq!(store.table_occupancy("t1", Some("g1")).await.unwrap(), 0);
        assert_eq!(store.guest_count_for_table("t1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = MemoryStore::new();
        assert!(!store.delete_guest("nope").await.unwrap());
        assert!(!store.delete_table("nope").await.unwrap());
    }
}

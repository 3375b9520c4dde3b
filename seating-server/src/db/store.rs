//! Storage contract shared by every backend

use async_trait::async_trait;
use shared::models::{Guest, Table, seats};
use thiserror::Error;

pub use crate::utils::result::StoreResult;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Corrupted record {id}: {reason}")]
    Corrupted { id: String, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err.to_string())
    }
}

macro_rules! redb_error {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StoreError {
                fn from(err: $ty) -> Self {
                    StoreError::Database(err.to_string())
                }
            }
        )*
    };
}

redb_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError
);

impl From<StoreError> for crate::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(e) => crate::AppError::storage_unavailable(e.to_string()),
            other => crate::AppError::database(other.to_string()),
        }
    }
}

/// Guest/table persistence
///
/// Records are keyed by id and replaced whole on save. `list_tables`
/// returns tables ordered by `number` (then id). The aggregate methods have
/// default implementations over the list methods; backends that can answer
/// them natively (one `SUM` query, one transaction) override them.
#[async_trait]
pub trait SeatingStore: Send + Sync {
    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    async fn list_guests(&self) -> StoreResult<Vec<Guest>>;
    async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>>;
    /// Insert or replace by id
    async fn save_guest(&self, guest: &Guest) -> StoreResult<()>;
    /// Returns false when no guest had this id
    async fn delete_guest(&self, id: &str) -> StoreResult<bool>;

    async fn list_tables(&self) -> StoreResult<Vec<Table>>;
    async fn get_table(&self, id: &str) -> StoreResult<Option<Table>>;
    /// Insert or replace by id
    async fn save_table(&self, table: &Table) -> StoreResult<()>;
    /// Returns false when no table had this id
    async fn delete_table(&self, id: &str) -> StoreResult<bool>;

    /// Seats taken at `table_id`, ignoring `exclude_guest` if given
    async fn table_occupancy(&self, table_id: &str, exclude_guest: Option<&str>) -> StoreResult<u32> {
        let guests = self.list_guests().await?;
        Ok(occupancy(&guests, table_id, exclude_guest))
    }

    /// Number of guests referencing `table_id`
    async fn guest_count_for_table(&self, table_id: &str) -> StoreResult<usize> {
        let guests = self.list_guests().await?;
        Ok(guests.iter().filter(|g| g.table_id == table_id).count())
    }

    /// Rewrite every table's `current_count` from the guests
    async fn recompute_table_counts(&self) -> StoreResult<()> {
        let guests = self.list_guests().await?;
        for mut table in self.list_tables().await? {
            let count = occupancy(&guests, &table.id, None);
            if table.current_count != count {
                table.current_count = count;
                self.save_table(&table).await?;
            }
        }
        Ok(())
    }

    /// Cheap liveness probe
    async fn ping(&self) -> StoreResult<()>;
}

/// Sum of seats over the guests assigned to `table_id`
pub fn occupancy(guests: &[Guest], table_id: &str, exclude_guest: Option<&str>) -> u32 {
    guests
        .iter()
        .filter(|g| g.table_id == table_id)
        .filter(|g| exclude_guest != Some(g.id.as_str()))
        .fold(0u32, |acc, g| acc.saturating_add(seats(g.places, g.children)))
}

/// Canonical table order: number, then id
pub fn sort_tables(tables: &mut [Table]) {
    tables.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
}

/// Canonical guest order: name, then id
pub fn sort_guests(guests: &mut [Guest]) {
    guests.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared::models::{Guest, Table};

    pub fn table(id: &str, number: i32, capacity: u32) -> Table {
        Table {
            id: id.to_string(),
            number,
            name: format!("Table {}", number),
            description: String::new(),
            capacity,
            current_count: 0,
        }
    }

    pub fn guest(id: &str, name: &str, table_id: &str, places: u32, children: u32) -> Guest {
        Guest {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            places,
            children,
            table_id: table_id.to_string(),
            arrived: false,
            arrival_time: None,
        }
    }
}

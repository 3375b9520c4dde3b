//! SQLite backend (sqlx)
//!
//! Aggregates run in SQL: occupancy is one `SUM` query and the count
//! refresh is a single `UPDATE ... (SELECT SUM ...)` statement.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Guest, Table};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use super::store::{SeatingStore, StoreError, StoreResult};

/// 宾客行
#[derive(sqlx::FromRow)]
struct GuestRow {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    places: i64,
    children: i64,
    table_id: String,
    arrived: bool,
    arrival_time: Option<String>,
}

impl TryFrom<GuestRow> for Guest {
    type Error = StoreError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let arrival_time = row
            .arrival_time
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| StoreError::Corrupted {
                id: row.id.clone(),
                reason: format!("arrival_time: {}", e),
            })?
            .map(|t| t.with_timezone(&Utc));

        Ok(Guest {
            places: to_u32(row.places),
            children: to_u32(row.children),
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            table_id: row.table_id,
            arrived: row.arrived,
            arrival_time,
        })
    }
}

/// 桌台行
#[derive(sqlx::FromRow)]
struct TableRow {
    id: String,
    number: i64,
    name: String,
    description: String,
    capacity: i64,
    current_count: i64,
}

impl From<TableRow> for Table {
    fn from(row: TableRow) -> Self {
        Table {
            id: row.id,
            number: i32::try_from(row.number).unwrap_or_default(),
            name: row.name,
            description: row.description,
            capacity: to_u32(row.capacity),
            current_count: to_u32(row.current_count),
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

const GUEST_COLUMNS: &str =
    "id, name, email, phone, places, children, table_id, arrived, arrival_time";
const TABLE_COLUMNS: &str = "id, number, name, description, capacity, current_count";

/// SQLite pool with the schema from `migrations/`
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) a WAL-mode database file and run migrations
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let url = format!("sqlite://{}", path.as_ref().display());
        let opts = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;
        Self::migrate(pool).await
    }

    /// Private in-memory database (single connection so every query sees it)
    pub async fn open_in_memory() -> StoreResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SeatingStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
        let rows = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guest ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>> {
        let row = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guest WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Guest::try_from).transpose()
    }

    async fn save_guest(&self, guest: &Guest) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO guest (id, name, email, phone, places, children, table_id, arrived, arrival_time)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                phone = excluded.phone,
                places = excluded.places,
                children = excluded.children,
                table_id = excluded.table_id,
                arrived = excluded.arrived,
                arrival_time = excluded.arrival_time",
        )
        .bind(&guest.id)
        .bind(&guest.name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(guest.places as i64)
        .bind(guest.children as i64)
        .bind(&guest.table_id)
        .bind(guest.arrived)
        .bind(guest.arrival_time.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_guest(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM guest WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tables(&self) -> StoreResult<Vec<Table>> {
        let rows = sqlx::query_as::<_, TableRow>(&format!(
            "SELECT {TABLE_COLUMNS} FROM seating_table ORDER BY number, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Table::from).collect())
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<Table>> {
        let row = sqlx::query_as::<_, TableRow>(&format!(
            "SELECT {TABLE_COLUMNS} FROM seating_table WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Table::from))
    }

    async fn save_table(&self, table: &Table) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO seating_table (id, number, name, description, capacity, current_count)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                number = excluded.number,
                name = excluded.name,
                description = excluded.description,
                capacity = excluded.capacity,
                current_count = excluded.current_count",
        )
        .bind(&table.id)
        .bind(table.number as i64)
        .bind(&table.name)
        .bind(&table.description)
        .bind(table.capacity as i64)
        .bind(table.current_count as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM seating_table WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn table_occupancy(&self, table_id: &str, exclude_guest: Option<&str>) -> StoreResult<u32> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(places + children), 0) FROM guest
             WHERE table_id = ? AND (? IS NULL OR id != ?)",
        )
        .bind(table_id)
        .bind(exclude_guest)
        .bind(exclude_guest)
        .fetch_one(&self.pool)
        .await?;
        Ok(to_u32(row.0))
    }

    async fn guest_count_for_table(&self, table_id: &str) -> StoreResult<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guest WHERE table_id = ?")
            .bind(table_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(row.0).unwrap_or_default())
    }

    async fn recompute_table_counts(&self) -> StoreResult<()> {
        sqlx::query(
            "UPDATE seating_table SET current_count = (
                SELECT COALESCE(SUM(places + children), 0) FROM guest
                WHERE guest.table_id = seating_table.id
             )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

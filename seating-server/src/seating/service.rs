//! Seating rules: capacity-checked guest mutation, table deletion guard,
//! arrival transitions and occupancy refresh.
//!
//! Every mutating method runs under one async write lock held across
//! read, check and write, so two concurrent assignments to the same table
//! cannot both pass the capacity check. Reads go straight to the store.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{
    ExactMatch, Guest, GuestCreate, GuestDetail, GuestUpdate, Overview, SearchResponse,
    SimilarGuests, Table, TableCreate, TableUpdate,
};
use shared::util::prefixed_id;
use tokio::sync::Mutex;

use super::overview::build_overview;
use crate::audit_log;
use crate::core::ResourceVersions;
use crate::db::SeatingStore;
use crate::search::{SearchOptions, SearchOutcome, resolve};
use crate::utils::validation::{
    MAX_QUERY_LEN, blank_to_none, is_blank, validate_payload, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const GUEST_RESOURCE: &str = "guest";
const TABLE_RESOURCE: &str = "table";

/// Guest/table mutations and the reads the API needs
pub struct SeatingService {
    store: Arc<dyn SeatingStore>,
    write_lock: Mutex<()>,
    versions: Arc<ResourceVersions>,
}

impl SeatingService {
    pub fn new(store: Arc<dyn SeatingStore>, versions: Arc<ResourceVersions>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            versions,
        }
    }

    pub fn store(&self) -> &Arc<dyn SeatingStore> {
        &self.store
    }

    // ========== Reads ==========

    pub async fn list_guests(&self) -> AppResult<Vec<Guest>> {
        Ok(self.store.list_guests().await?)
    }

    pub async fn list_tables(&self) -> AppResult<Vec<Table>> {
        Ok(self.store.list_tables().await?)
    }

    /// Guest list for read-only screens; a storage failure yields an empty list
    pub async fn guests_or_empty(&self) -> Vec<Guest> {
        self.store.list_guests().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read guests, serving empty list");
            Vec::new()
        })
    }

    /// Table list for read-only screens; a storage failure yields an empty list
    pub async fn tables_or_empty(&self) -> Vec<Table> {
        self.store.list_tables().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read tables, serving empty list");
            Vec::new()
        })
    }

    pub async fn get_guest(&self, id: &str) -> AppResult<Guest> {
        self.store
            .get_guest(id)
            .await?
            .ok_or_else(|| AppError::guest_not_found(id))
    }

    pub async fn get_table(&self, id: &str) -> AppResult<Table> {
        self.store
            .get_table(id)
            .await?
            .ok_or_else(|| AppError::table_not_found(id))
    }

    /// Guest plus the table it sits at (None if the table is gone)
    pub async fn guest_detail(&self, id: &str) -> AppResult<GuestDetail> {
        let guest = self.get_guest(id).await?;
        let table = self.store.get_table(&guest.table_id).await?;
        Ok(GuestDetail { guest, table })
    }

    /// Resolve a search query
    pub async fn search(&self, query: &str, options: &SearchOptions) -> AppResult<SearchResponse> {
        validate_required_text(query, "Query", MAX_QUERY_LEN)?;

        let guests = self.guests_or_empty().await;
        match resolve(query, &guests, options) {
            SearchOutcome::Exact(guest) => {
                let table = self.store.get_table(&guest.table_id).await.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, table_id = %guest.table_id, "Failed to read table");
                    None
                });
                Ok(SearchResponse::Exact(ExactMatch {
                    exact_match: guest,
                    table,
                }))
            }
            SearchOutcome::Similar(similar) => {
                Ok(SearchResponse::Similar(SimilarGuests { similar }))
            }
        }
    }

    /// Totals and per-table rosters
    pub async fn overview(&self) -> Overview {
        let (tables, guests) = tokio::join!(self.tables_or_empty(), self.guests_or_empty());
        build_overview(tables, guests)
    }

    // ========== Guest mutations ==========

    pub async fn create_guest(&self, payload: GuestCreate) -> AppResult<Guest> {
        let payload = GuestCreate {
            name: payload.name.trim().to_string(),
            email: blank_to_none(payload.email),
            phone: blank_to_none(payload.phone),
            ..payload
        };
        validate_payload(&payload)?;

        let _guard = self.write_lock.lock().await;

        let table = self.get_table(&payload.table_id).await?;
        let guest = Guest {
            id: prefixed_id('g'),
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            places: payload.places,
            children: payload.children,
            table_id: payload.table_id,
            arrived: false,
            arrival_time: None,
        };
        self.ensure_capacity(&table, None, guest.seats()).await?;

        self.store.save_guest(&guest).await?;
        self.after_guest_write().await;

        audit_log!("admin", "create_guest", guest.id, guest.name);
        Ok(guest)
    }

    /// Merge `payload` onto the stored guest
    ///
    /// An empty `email` / `phone` clears the field. Capacity is checked when
    /// the table or the seat count changes.
    pub async fn update_guest(&self, id: &str, payload: GuestUpdate) -> AppResult<Guest> {
        let clear_email = is_blank(&payload.email);
        let clear_phone = is_blank(&payload.phone);
        let payload = GuestUpdate {
            name: payload.name.map(|n| n.trim().to_string()),
            email: blank_to_none(payload.email),
            phone: blank_to_none(payload.phone),
            ..payload
        };
        validate_payload(&payload)?;

        let _guard = self.write_lock.lock().await;

        let existing = self.get_guest(id).await?;
        let mut candidate = payload.apply_to(&existing);
        if clear_email {
            candidate.email = None;
        }
        if clear_phone {
            candidate.phone = None;
        }

        let table_changed = candidate.table_id != existing.table_id;
        let seats_changed =
            candidate.places != existing.places || candidate.children != existing.children;
        if table_changed || seats_changed {
            let table = self.get_table(&candidate.table_id).await?;
            self.ensure_capacity(&table, Some(&candidate.id), candidate.seats())
                .await?;
        }

        self.store.save_guest(&candidate).await?;
        self.after_guest_write().await;

        audit_log!("admin", "update_guest", candidate.id, candidate.name);
        Ok(candidate)
    }

    /// Delete a guest, returning the removed record
    pub async fn delete_guest(&self, id: &str) -> AppResult<Guest> {
        let _guard = self.write_lock.lock().await;

        let existing = self.get_guest(id).await?;
        if !self.store.delete_guest(id).await? {
            return Err(AppError::guest_not_found(id));
        }
        self.after_guest_write().await;

        audit_log!("admin", "delete_guest", existing.id, existing.name);
        Ok(existing)
    }

    /// NotArrived -> Arrived, stamping the arrival time
    pub async fn mark_arrived(&self, id: &str) -> AppResult<Guest> {
        self.set_arrival(id, true).await
    }

    /// Arrived -> NotArrived, clearing the arrival time
    pub async fn cancel_arrival(&self, id: &str) -> AppResult<Guest> {
        self.set_arrival(id, false).await
    }

    async fn set_arrival(&self, id: &str, arrived: bool) -> AppResult<Guest> {
        let _guard = self.write_lock.lock().await;

        let mut guest = self.get_guest(id).await?;
        guest.arrived = arrived;
        guest.arrival_time = arrived.then(Utc::now);

        self.store.save_guest(&guest).await?;
        self.versions.increment(GUEST_RESOURCE);

        tracing::info!(guest_id = %guest.id, arrived, "Arrival state changed");
        Ok(guest)
    }

    // ========== Table mutations ==========

    pub async fn create_table(&self, payload: TableCreate) -> AppResult<Table> {
        let payload = TableCreate {
            name: payload.name.trim().to_string(),
            ..payload
        };
        validate_payload(&payload)?;

        let _guard = self.write_lock.lock().await;

        let table = Table {
            id: prefixed_id('t'),
            number: payload.number,
            name: payload.name,
            description: payload.description,
            capacity: payload.capacity,
            current_count: 0,
        };
        self.store.save_table(&table).await?;
        self.versions.increment(TABLE_RESOURCE);

        audit_log!("admin", "create_table", table.id, table.name);
        Ok(table)
    }

    /// Merge `payload` onto the stored table
    ///
    /// Lowering the capacity below the seats already taken is refused.
    pub async fn update_table(&self, id: &str, payload: TableUpdate) -> AppResult<Table> {
        let payload = TableUpdate {
            name: payload.name.map(|n| n.trim().to_string()),
            ..payload
        };
        validate_payload(&payload)?;

        let _guard = self.write_lock.lock().await;

        let existing = self.get_table(id).await?;
        let mut candidate = payload.apply_to(&existing);

        let occupancy = self.store.table_occupancy(id, None).await?;
        if occupancy > candidate.capacity {
            return Err(AppError::capacity_exceeded(
                &candidate.name,
                occupancy,
                0,
                candidate.capacity,
            ));
        }
        candidate.current_count = occupancy;

        self.store.save_table(&candidate).await?;
        self.versions.increment(TABLE_RESOURCE);

        audit_log!("admin", "update_table", candidate.id, candidate.name);
        Ok(candidate)
    }

    /// Delete a table that no guest references
    pub async fn delete_table(&self, id: &str) -> AppResult<Table> {
        let _guard = self.write_lock.lock().await;

        let existing = self.get_table(id).await?;
        let assigned = self.store.guest_count_for_table(id).await?;
        if assigned > 0 {
            return Err(AppError::table_has_guests(id, assigned));
        }

        if !self.store.delete_table(id).await? {
            return Err(AppError::table_not_found(id));
        }
        self.versions.increment(TABLE_RESOURCE);

        audit_log!("admin", "delete_table", existing.id, existing.name);
        Ok(existing)
    }

    /// Rebuild every table's `current_count` from the guests
    pub async fn recompute_table_counts(&self) -> AppResult<Vec<Table>> {
        let _guard = self.write_lock.lock().await;

        self.store.recompute_table_counts().await?;
        self.versions.increment(TABLE_RESOURCE);
        Ok(self.store.list_tables().await?)
    }

    // ========== Helpers ==========

    async fn ensure_capacity(
        &self,
        table: &Table,
        exclude_guest: Option<&str>,
        requested: u32,
    ) -> AppResult<()> {
        let occupancy = self.store.table_occupancy(&table.id, exclude_guest).await?;
        if occupancy.saturating_add(requested) > table.capacity {
            return Err(AppError::capacity_exceeded(
                &table.name,
                occupancy,
                requested,
                table.capacity,
            ));
        }
        Ok(())
    }

    /// Refresh derived counts after a guest write; the write itself stands
    async fn after_guest_write(&self) {
        self.versions.increment(GUEST_RESOURCE);
        match self.store.recompute_table_counts().await {
            Ok(()) => {
                self.versions.increment(TABLE_RESOURCE);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to recompute table counts after guest write");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, StoreError, StoreResult};
    use crate::search::ExactMatchPolicy;
    use async_trait::async_trait;
    use shared::ErrorCode;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn service() -> SeatingService {
        SeatingService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ResourceVersions::new()),
        )
    }

    fn table_payload(number: i32, capacity: u32) -> TableCreate {
        TableCreate {
            number,
            name: format!("Table {}", number),
            description: String::new(),
            capacity,
        }
    }

    fn guest_payload(name: &str, table_id: &str, places: u32, children: u32) -> GuestCreate {
        GuestCreate {
            name: name.to_string(),
            email: None,
            phone: None,
            places,
            children,
            table_id: table_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_capacity_counts_children() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();

        svc.create_guest(guest_payload("Famille Roux", &table.id, 6, 2))
            .await
            .unwrap();
        assert_eq!(svc.get_table(&table.id).await.unwrap().current_count, 8);

        let err = svc
            .create_guest(guest_payload("Paul", &table.id, 3, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);
        assert_eq!(svc.list_guests().await.unwrap().len(), 1);
        assert_eq!(svc.get_table(&table.id).await.unwrap().current_count, 8);
    }

    #[tokio::test]
    async fn test_create_guest_unknown_table() {
        let svc = service();
        let err = svc
            .create_guest(guest_payload("Paul", "t-missing", 1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_create_guest_validation_before_write() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        let err = svc
            .create_guest(guest_payload("   ", &table.id, 1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(svc.list_guests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_excludes_self_from_occupancy() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 4)).await.unwrap();
        let guest = svc
            .create_guest(guest_payload("Anne", &table.id, 3, 0))
            .await
            .unwrap();

        let updated = svc
            .update_guest(
                &guest.id,
                GuestUpdate {
                    places: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.places, 4);
        assert_eq!(svc.get_table(&table.id).await.unwrap().current_count, 4);

        let err = svc
            .update_guest(
                &guest.id,
                GuestUpdate {
                    children: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);
    }

    #[tokio::test]
    async fn test_move_guest_between_tables() {
        let svc = service();
        let t1 = svc.create_table(table_payload(1, 10)).await.unwrap();
        let t2 = svc.create_table(table_payload(2, 2)).await.unwrap();
        let guest = svc
            .create_guest(guest_payload("Anne", &t1.id, 2, 0))
            .await
            .unwrap();
        svc.create_guest(guest_payload("Bruno", &t2.id, 1, 0))
            .await
            .unwrap();

        let err = svc
            .update_guest(
                &guest.id,
                GuestUpdate {
                    table_id: Some(t2.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);

        let moved = svc
            .update_guest(
                &guest.id,
                GuestUpdate {
                    table_id: Some(t2.id.clone()),
                    places: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.table_id, t2.id);
        assert_eq!(svc.get_table(&t1.id).await.unwrap().current_count, 0);
        assert_eq!(svc.get_table(&t2.id).await.unwrap().current_count, 2);
    }

    #[tokio::test]
    async fn test_update_clears_blank_contact() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        let mut payload = guest_payload("Anne", &table.id, 1, 0);
        payload.email = Some("anne@example.com".to_string());
        payload.phone = Some("  ".to_string());
        let guest = svc.create_guest(payload).await.unwrap();
        assert_eq!(guest.phone, None);

        let updated = svc
            .update_guest(
                &guest.id,
                GuestUpdate {
                    email: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, None);
        assert_eq!(updated.name, "Anne");
    }

    #[tokio::test]
    async fn test_table_deletion_guard() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        let guest = svc
            .create_guest(guest_payload("Anne", &table.id, 1, 0))
            .await
            .unwrap();

        let err = svc.delete_table(&table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableHasGuests);
        assert_eq!(svc.list_tables().await.unwrap().len(), 1);
        assert_eq!(svc.list_guests().await.unwrap().len(), 1);

        svc.delete_guest(&guest.id).await.unwrap();
        let deleted = svc.delete_table(&table.id).await.unwrap();
        assert_eq!(deleted.id, table.id);

        let err = svc.delete_table(&table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_lowering_capacity_below_occupancy() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        svc.create_guest(guest_payload("Anne", &table.id, 5, 0))
            .await
            .unwrap();

        let err = svc
            .update_table(
                &table.id,
                TableUpdate {
                    capacity: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);

        let updated = svc
            .update_table(
                &table.id,
                TableUpdate {
                    capacity: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.capacity, 5);
        assert_eq!(updated.current_count, 5);
    }

    #[tokio::test]
    async fn test_arrival_toggle() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        let guest = svc
            .create_guest(guest_payload("Anne", &table.id, 1, 0))
            .await
            .unwrap();

        let arrived = svc.mark_arrived(&guest.id).await.unwrap();
        assert!(arrived.arrived);
        assert!(arrived.arrival_time.is_some());

        let cancelled = svc.cancel_arrival(&guest.id).await.unwrap();
        assert!(!cancelled.arrived);
        assert!(cancelled.arrival_time.is_none());

        let err = svc.mark_arrived("g-missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GuestNotFound);
    }

    #[tokio::test]
    async fn test_concurrent_assignments_respect_capacity() {
        let svc = Arc::new(service());
        let table = svc.create_table(table_payload(1, 5)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let svc = svc.clone();
            let table_id = table.id.clone();
            handles.push(tokio::spawn(async move {
                svc.create_guest(guest_payload(&format!("Guest {}", i), &table_id, 1, 0))
                    .await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 5);
        assert_eq!(svc.get_table(&table.id).await.unwrap().current_count, 5);
    }

    #[tokio::test]
    async fn test_recompute_repairs_stale_counts() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        svc.create_guest(guest_payload("Anne", &table.id, 2, 1))
            .await
            .unwrap();

        let mut stale = svc.get_table(&table.id).await.unwrap();
        stale.current_count = 0;
        svc.store().save_table(&stale).await.unwrap();

        let tables = svc.recompute_table_counts().await.unwrap();
        assert_eq!(tables[0].current_count, 3);
        let again = svc.recompute_table_counts().await.unwrap();
        assert_eq!(tables, again);
    }

    #[tokio::test]
    async fn test_search_exact_and_blank() {
        let svc = service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        svc.create_guest(guest_payload("Élodie Lefèvre", &table.id, 1, 0))
            .await
            .unwrap();
        let options = SearchOptions {
            exact_policy: ExactMatchPolicy::FullName,
            min_similarity: 0.5,
        };

        match svc.search("ELODIE lefevre", &options).await.unwrap() {
            SearchResponse::Exact(found) => {
                assert_eq!(found.exact_match.name, "Élodie Lefèvre");
                assert_eq!(found.table.map(|t| t.id), Some(table.id.clone()));
            }
            other => panic!("expected exact match, got {:?}", other),
        }

        let err = svc.search("  ", &options).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Query required");
    }

    #[tokio::test]
    async fn test_versions_bumped_by_mutations() {
        let versions = Arc::new(ResourceVersions::new());
        let svc = SeatingService::new(Arc::new(MemoryStore::new()), versions.clone());
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        assert_eq!(versions.get("table"), 1);

        svc.create_guest(guest_payload("Anne", &table.id, 1, 0))
            .await
            .unwrap();
        assert_eq!(versions.get("guest"), 1);
        assert_eq!(versions.get("table"), 2);
    }

    /// Memory store with switchable failures
    struct FailingStore {
        inner: MemoryStore,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        fail_recompute: AtomicBool,
    }

    impl FailingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_reads: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                fail_recompute: AtomicBool::new(false),
            }
        }

        fn check(flag: &AtomicBool) -> StoreResult<()> {
            if flag.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other("disk offline")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SeatingStore for FailingStore {
        fn backend(&self) -> &'static str {
            "failing"
        }

        async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
            Self::check(&self.fail_reads)?;
            self.inner.list_guests().await
        }

        async fn get_guest(&self, id: &str) -> StoreResult<Option<Guest>> {
            self.inner.get_guest(id).await
        }

        async fn save_guest(&self, guest: &Guest) -> StoreResult<()> {
            Self::check(&self.fail_writes)?;
            self.inner.save_guest(guest).await
        }

        async fn delete_guest(&self, id: &str) -> StoreResult<bool> {
            Self::check(&self.fail_writes)?;
            self.inner.delete_guest(id).await
        }

        async fn list_tables(&self) -> StoreResult<Vec<Table>> {
            Self::check(&self.fail_reads)?;
            self.inner.list_tables().await
        }

        async fn get_table(&self, id: &str) -> StoreResult<Option<Table>> {
            self.inner.get_table(id).await
        }

        async fn save_table(&self, table: &Table) -> StoreResult<()> {
            Self::check(&self.fail_writes)?;
            self.inner.save_table(table).await
        }

        async fn delete_table(&self, id: &str) -> StoreResult<bool> {
            Self::check(&self.fail_writes)?;
            self.inner.delete_table(id).await
        }

        async fn table_occupancy(
            &self,
            table_id: &str,
            exclude_guest: Option<&str>,
        ) -> StoreResult<u32> {
            self.inner.table_occupancy(table_id, exclude_guest).await
        }

        async fn guest_count_for_table(&self, table_id: &str) -> StoreResult<usize> {
            self.inner.guest_count_for_table(table_id).await
        }

        async fn recompute_table_counts(&self) -> StoreResult<()> {
            Self::check(&self.fail_recompute)?;
            self.inner.recompute_table_counts().await
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    fn failing_service() -> (SeatingService, Arc<FailingStore>, Arc<ResourceVersions>) {
        let store = Arc::new(FailingStore::new());
        let versions = Arc::new(ResourceVersions::new());
        let svc = SeatingService::new(store.clone(), versions.clone());
        (svc, store, versions)
    }

    #[tokio::test]
    async fn test_guest_write_stands_when_recompute_fails() {
        let (svc, store, versions) = failing_service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        store.fail_recompute.store(true, Ordering::SeqCst);

        let guest = svc
            .create_guest(guest_payload("Anne", &table.id, 2, 0))
            .await
            .unwrap();

        let stored = svc.get_guest(&guest.id).await.unwrap();
        assert_eq!(stored, guest);
        assert_eq!(versions.get("guest"), 1);
        // counts were not refreshed, so the table version stays put
        assert_eq!(versions.get("table"), 1);
        assert_eq!(svc.get_table(&table.id).await.unwrap().current_count, 0);

        store.fail_recompute.store(false, Ordering::SeqCst);
        let tables = svc.recompute_table_counts().await.unwrap();
        assert_eq!(tables[0].current_count, 2);
    }

    #[tokio::test]
    async fn test_write_errors_propagate() {
        let (svc, store, versions) = failing_service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        let guest = svc
            .create_guest(guest_payload("Anne", &table.id, 1, 0))
            .await
            .unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        let err = svc
            .create_guest(guest_payload("Bruno", &table.id, 1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageUnavailable);

        let err = svc.mark_arrived(&guest.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageUnavailable);

        let err = svc.create_table(table_payload(2, 4)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageUnavailable);

        store.fail_writes.store(false, Ordering::SeqCst);
        let guests = svc.list_guests().await.unwrap();
        assert_eq!(guests.len(), 1);
        assert!(!guests[0].arrived);
        assert_eq!(versions.get("guest"), 1);
    }

    #[tokio::test]
    async fn test_read_errors_degrade_to_empty() {
        let (svc, store, _) = failing_service();
        let table = svc.create_table(table_payload(1, 10)).await.unwrap();
        svc.create_guest(guest_payload("Anne Martin", &table.id, 2, 0))
            .await
            .unwrap();
        store.fail_reads.store(true, Ordering::SeqCst);

        let overview = svc.overview().await;
        assert!(overview.tables.is_empty());
        assert_eq!(overview.totals.guests, 0);
        assert_eq!(overview.totals.total_capacity, 0);

        let options = SearchOptions {
            exact_policy: ExactMatchPolicy::FullName,
            min_similarity: 0.5,
        };
        match svc.search("Anne Martin", &options).await.unwrap() {
            SearchResponse::Similar(found) => assert!(found.similar.is_empty()),
            other => panic!("expected empty similar list, got {:?}", other),
        }

        assert!(svc.guests_or_empty().await.is_empty());
        assert!(svc.tables_or_empty().await.is_empty());

        // strict reads still report the failure
        let err = svc.list_guests().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageUnavailable);
    }
}

//! Aggregates for the overview screen and the exported guest list

use std::collections::HashMap;

use shared::models::{Guest, Overview, OverviewTotals, Table, TableRoster};

use crate::db::occupancy;
use crate::db::store::{sort_guests, sort_tables};

/// Group guests under their tables and compute the totals
///
/// Table counts are derived from `guests` here, not read from the cached
/// `current_count`, so the overview is correct even before a recompute.
pub fn build_overview(mut tables: Vec<Table>, mut guests: Vec<Guest>) -> Overview {
    sort_tables(&mut tables);
    sort_guests(&mut guests);

    let mut totals = OverviewTotals {
        guests: guests.len(),
        tables: tables.len(),
        ..Default::default()
    };
    let mut total_seats = 0u32;
    for guest in &guests {
        totals.places = totals.places.saturating_add(guest.places);
        totals.children = totals.children.saturating_add(guest.children);
        total_seats = total_seats.saturating_add(guest.seats());
        if guest.arrived {
            totals.arrived += 1;
            totals.arrived_places = totals.arrived_places.saturating_add(guest.seats());
        }
    }
    totals.remaining_places = total_seats.saturating_sub(totals.arrived_places);

    let mut by_table: HashMap<&str, Vec<Guest>> = HashMap::new();
    for guest in &guests {
        by_table
            .entry(guest.table_id.as_str())
            .or_default()
            .push(guest.clone());
    }

    let rosters: Vec<TableRoster> = tables
        .iter()
        .map(|table| {
            let mut table = table.clone();
            table.current_count = occupancy(&guests, &table.id, None);
            totals.used_capacity = totals.used_capacity.saturating_add(table.current_count);
            totals.total_capacity = totals.total_capacity.saturating_add(table.capacity);
            let guests = by_table.remove(table.id.as_str()).unwrap_or_default();
            TableRoster { table, guests }
        })
        .collect();

    // whatever is left references a table that no longer exists
    let mut unassigned: Vec<Guest> = by_table.into_values().flatten().collect();
    sort_guests(&mut unassigned);

    Overview {
        totals,
        tables: rosters,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::fixtures::{guest, table};

    #[test]
    fn test_totals() {
        let tables = vec![table("t2", 2, 6), table("t1", 1, 10)];
        let mut arrived = guest("g1", "Alice", "t1", 6, 2);
        arrived.arrived = true;
        let guests = vec![arrived, guest("g2", "Bob", "t2", 3, 0)];

        let overview = build_overview(tables, guests);
        let totals = &overview.totals;

        assert_eq!(totals.guests, 2);
        assert_eq!(totals.arrived, 1);
        assert_eq!(totals.tables, 2);
        assert_eq!(totals.places, 9);
        assert_eq!(totals.children, 2);
        assert_eq!(totals.arrived_places, 8);
        assert_eq!(totals.remaining_places, 3);
        assert_eq!(totals.used_capacity, 11);
        assert_eq!(totals.total_capacity, 16);
    }

    #[test]
    fn test_rosters_ordered_by_table_number() {
        let tables = vec![table("t2", 2, 6), table("t1", 1, 10), table("t3", 3, 4)];
        let guests = vec![
            guest("g2", "Zoé", "t1", 1, 0),
            guest("g1", "Anne", "t1", 1, 0),
            guest("g3", "Orphan", "gone", 1, 0),
        ];

        let overview = build_overview(tables, guests);
        let ids: Vec<&str> = overview.tables.iter().map(|r| r.table.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);

        let names: Vec<&str> = overview.tables[0].guests.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Anne", "Zoé"]);
        assert_eq!(overview.tables[0].table.current_count, 2);
        assert!(overview.tables[2].guests.is_empty());

        assert_eq!(overview.unassigned.len(), 1);
        assert_eq!(overview.unassigned[0].id, "g3");
    }
}

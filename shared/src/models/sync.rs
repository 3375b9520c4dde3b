//! Sync and overview payloads

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Guest, Table};

/// Full snapshot returned by `/api/sync`
///
/// Clients compare `versions` against what they hold to decide whether to
/// re-render. Versions restart from zero when the server restarts, so `epoch`
/// is sent alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub guests: Vec<Guest>,
    pub tables: Vec<Table>,
    /// Server time of the snapshot (Unix millis)
    pub timestamp: i64,
    /// Server instance epoch (generated at startup)
    pub epoch: String,
    /// Current version per resource type
    pub versions: HashMap<String, u64>,
}

/// Aggregate counters for the overview screen and the exported list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewTotals {
    pub guests: usize,
    pub arrived: usize,
    pub tables: usize,
    pub places: u32,
    pub children: u32,
    pub arrived_places: u32,
    pub remaining_places: u32,
    pub used_capacity: u32,
    pub total_capacity: u32,
}

/// One table with the guests sitting at it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRoster {
    pub table: Table,
    pub guests: Vec<Guest>,
}

/// Overview: totals plus per-table rosters ordered by table number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub totals: OverviewTotals,
    pub tables: Vec<TableRoster>,
    /// Guests whose table id does not resolve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unassigned: Vec<Guest>,
}

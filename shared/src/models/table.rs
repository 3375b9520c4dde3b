//! Seating Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Seating table entity
///
/// `current_count` is a cache derived from the guests assigned to the table.
/// It is recomputed after every guest mutation and never trusted for checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// Display order key (not unique)
    pub number: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub capacity: u32,
    #[serde(default)]
    pub current_count: u32,
}

impl Table {
    /// Seats still free according to the cached count
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.current_count)
    }
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableCreate {
    pub number: i32,
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "description is too long"))]
    pub description: String,
    #[validate(range(min = 1, max = 10000, message = "capacity must be at least 1"))]
    pub capacity: u32,
}

/// Update table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description is too long"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10000, message = "capacity must be at least 1"))]
    pub capacity: Option<u32>,
}

impl TableUpdate {
    /// Apply this update onto a stored table
    pub fn apply_to(&self, table: &Table) -> Table {
        Table {
            id: table.id.clone(),
            number: self.number.unwrap_or(table.number),
            name: self.name.clone().unwrap_or_else(|| table.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| table.description.clone()),
            capacity: self.capacity.unwrap_or(table.capacity),
            current_count: table.current_count,
        }
    }
}

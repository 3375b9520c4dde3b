//! Guest Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Seats consumed by a party: adult places plus children.
///
/// This is the only seat-counting rule. Capacity checks, occupancy sums and
/// `Table::current_count` all go through it.
pub fn seats(places: u32, children: u32) -> u32 {
    places.saturating_add(children)
}

/// Guest entity (one invited party)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub places: u32,
    #[serde(default)]
    pub children: u32,
    pub table_id: String,
    #[serde(default)]
    pub arrived: bool,
    #[serde(default)]
    pub arrival_time: Option<DateTime<Utc>>,
}

impl Guest {
    /// Seats this guest takes at its table
    pub fn seats(&self) -> u32 {
        seats(self.places, self.children)
    }
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "phone is too long"))]
    pub phone: Option<String>,
    #[validate(range(min = 1, max = 500, message = "places must be between 1 and 500"))]
    pub places: u32,
    #[serde(default)]
    #[validate(range(max = 500, message = "children must be at most 500"))]
    pub children: u32,
    #[validate(length(min = 1, message = "tableId is required"))]
    pub table_id: String,
}

/// Update guest payload
///
/// Absent fields keep their stored value. Arrival state is not part of the
/// update payload; it only changes through check-in / cancel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "phone is too long"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 500, message = "places must be between 1 and 500"))]
    pub places: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 500, message = "children must be at most 500"))]
    pub children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "tableId must not be empty"))]
    pub table_id: Option<String>,
}

impl GuestUpdate {
    /// Apply this update onto a stored guest, producing the candidate record
    pub fn apply_to(&self, guest: &Guest) -> Guest {
        Guest {
            id: guest.id.clone(),
            name: self.name.clone().unwrap_or_else(|| guest.name.clone()),
            email: self.email.clone().or_else(|| guest.email.clone()),
            phone: self.phone.clone().or_else(|| guest.phone.clone()),
            places: self.places.unwrap_or(guest.places),
            children: self.children.unwrap_or(guest.children),
            table_id: self
                .table_id
                .clone()
                .unwrap_or_else(|| guest.table_id.clone()),
            arrived: guest.arrived,
            arrival_time: guest.arrival_time,
        }
    }
}

/// Guest together with the table it sits at
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetail {
    pub guest: Guest,
    pub table: Option<super::Table>,
}

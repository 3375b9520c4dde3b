//! Seating domain: guest/table consistency rules and aggregates

pub mod overview;
pub mod service;

pub use overview::build_overview;
pub use service::SeatingService;

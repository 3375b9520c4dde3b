//! Data models
//!
//! Shared between the server and its clients (via API).
//! JSON field names are camelCase; ids are opaque prefixed strings.

pub mod auth;
pub mod guest;
pub mod search;
pub mod sync;
pub mod table;

// Re-exports
pub use auth::*;
pub use guest::*;
pub use search::*;
pub use sync::*;
pub use table::*;

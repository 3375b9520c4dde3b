//! Search payloads

use serde::{Deserialize, Serialize};

use super::{Guest, Table};

/// Query string of `GET /api/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Unambiguous match: go straight to the guest card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactMatch {
    pub exact_match: Guest,
    pub table: Option<Table>,
}

/// Candidate list, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarGuests {
    pub similar: Vec<Guest>,
}

/// Response of `GET /api/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Exact(ExactMatch),
    Similar(SimilarGuests),
}

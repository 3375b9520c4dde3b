//! Guest search
//!
//! [`resolve`] turns a free-text query into either one exact guest or a
//! ranked list of candidates. Matching works on [`normalize`]d names.

pub mod matcher;
pub mod normalize;

pub use matcher::{SearchOutcome, resolve};
pub use normalize::normalize;

use std::str::FromStr;

/// When a query counts as an exact match (`SEARCH_EXACT_POLICY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactMatchPolicy {
    /// Normalized name equals the normalized query
    FullName,
    /// Full name, else the query is contained in exactly one name
    UniqueSubstring,
}

impl FromStr for ExactMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full_name" | "full" => Ok(Self::FullName),
            "unique_substring" | "substring" => Ok(Self::UniqueSubstring),
            other => Err(format!("unknown exact match policy: {}", other)),
        }
    }
}

/// Search tuning
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub exact_policy: ExactMatchPolicy,
    /// Fuzzy candidates scoring below this are dropped (0.0..=1.0)
    pub min_similarity: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            exact_policy: ExactMatchPolicy::UniqueSubstring,
            min_similarity: 0.5,
        }
    }
}

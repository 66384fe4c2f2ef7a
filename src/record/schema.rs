//! Record schema definitions
//!
//! These types match the JSON the record store persists and the payloads
//! the HTTP API returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Record
// =============================================================================

/// One captured session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Primary media file. Side-files share its stem.
    pub save_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Create a new record with a fresh id
    pub fn new(recorder_id: Option<String>, save_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recorder_id,
            name: None,
            save_path: save_path.into(),
            created_at: Some(Utc::now()),
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Range query against the record store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub recorder_id: Option<String>,
    pub start: usize,
    pub count: usize,
}

/// A bounded window of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Size of the whole (filtered) population, not of `items`
    pub total: usize,
}

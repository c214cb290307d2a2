//! Events (tournaments / sessions) and table seeding.

use crate::id::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled competition owning tables and registrations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Id,
    pub name: String,
    pub tables_count: u32,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default, with = "crate::time::lenient")]
    pub starts_at: Option<DateTime<Utc>>,

    #[serde(default, with = "crate::time::lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Secondary line shown under the event name: `"Hall A • 3 tables"`.
    pub fn summary_line(&self) -> String {
        let mut pieces = Vec::new();
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            pieces.push(location.to_string());
        }
        pieces.push(format!(
            "{} table{}",
            self.tables_count,
            if self.tables_count == 1 { "" } else { "s" }
        ));
        pieces.join(" • ")
    }
}

/// Body of `POST /events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub tables_count: u32,
    #[serde(default, with = "crate::time::lenient")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `POST /events/{id}/tables/seed`.
///
/// `count: None` lets the service fall back to the event's `tables_count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedRequest {
    pub count: Option<u32>,
    pub start_at: u32,
    pub reset: bool,
}

impl SeedRequest {
    /// Seeding chained after event creation: wipe, then positions `1..=count`.
    pub fn fresh(count: u32) -> Self {
        Self {
            count: Some(count),
            start_at: 1,
            reset: true,
        }
    }
}

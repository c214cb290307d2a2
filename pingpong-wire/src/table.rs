//! Table board types and the assignment lifecycle.
//!
//! A table is a physical table of an event. While occupied it carries the
//! current assignment (two players) and that assignment's lifecycle
//! timestamps: created, notified, timer started, ended.

use crate::id::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `GET /events/{id}/tables/board`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Table identifier
    pub id: Id,

    /// Owning event (omitted by some board snapshots)
    #[serde(default)]
    pub event_id: Option<Id>,

    /// Occupancy status
    pub status: TableStatus,

    /// Position of the table in the hall (1-based)
    #[serde(default)]
    pub position: Option<u32>,

    /// Operator-facing label, overrides "Table N"
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub current_assignment_id: Option<Id>,

    #[serde(default)]
    pub assignment_status: Option<AssignmentStatus>,

    #[serde(default, with = "crate::time::lenient")]
    pub assignment_created_at: Option<DateTime<Utc>>,

    /// Set once the match timer has been started
    #[serde(default, with = "crate::time::lenient")]
    pub started_at: Option<DateTime<Utc>>,

    /// Set once the players have been notified
    #[serde(default, with = "crate::time::lenient")]
    pub notified_at: Option<DateTime<Utc>>,

    #[serde(default, with = "crate::time::lenient")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub player1: Option<PlayerSlim>,

    #[serde(default)]
    pub player2: Option<PlayerSlim>,
}

impl Table {
    pub fn is_free(&self) -> bool {
        self.status == TableStatus::Free
    }

    /// `label`, else `"Table {position}"`, else `"Table {id}"`.
    pub fn display_name(&self) -> String {
        match (self.label.as_deref().filter(|l| !l.trim().is_empty()), self.position) {
            (Some(label), _) => label.to_string(),
            (None, Some(position)) => format!("Table {}", position),
            (None, None) => format!("Table {}", self.id),
        }
    }

    /// Seated players, in seat order.
    pub fn players(&self) -> Vec<&PlayerSlim> {
        self.player1.iter().chain(self.player2.iter()).collect()
    }

    pub fn has_active_assignment(&self) -> bool {
        self.assignment_status == Some(AssignmentStatus::Active)
    }
}

/// Player reference embedded in a board row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSlim {
    pub id: Id,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Table occupancy status.
///
/// The service only documents `free` and `occupied`; anything else is kept
/// verbatim so it can be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableStatus {
    Free,
    Occupied,
    Other(String),
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Occupied => write!(f, "occupied"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for TableStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "free" => Self::Free,
            "occupied" => Self::Occupied,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for TableStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TableStatus> for String {
    fn from(status: TableStatus) -> Self {
        status.to_string()
    }
}

/// Status of the assignment currently attached to a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentStatus {
    Active,
    Finished,
    Other(String),
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Finished => write!(f, "finished"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AssignmentStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "finished" | "ended" => Self::Finished,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for AssignmentStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<AssignmentStatus> for String {
    fn from(status: AssignmentStatus) -> Self {
        status.to_string()
    }
}

/// Body of `POST /events/{id}/tables/{id}/assign`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignRequest {
    pub player1_id: Id,
    pub player2_id: Id,
    pub notify: bool,
}

/// Body of `POST /events/{id}/assignments/{id}/move`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveAssignmentRequest {
    pub new_table_id: Id,
}

/// Body of `POST /events/{id}/tables/swap`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapTablesRequest {
    pub table_a_id: Id,
    pub table_b_id: Id,
}

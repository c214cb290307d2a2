//! Agents, players and event registrations.

use crate::id::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated operator identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id: Id,
    pub full_name: String,
    pub email: String,
    #[serde(default, with = "crate::time::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentLoginResponse {
    pub agent: Agent,
    pub token: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// A person in the global roster, independent of any event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: Id,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_playing: Option<bool>,
}

impl Player {
    /// Build a player from a `GET /players` row.
    ///
    /// Several schema generations are in circulation, so the read path accepts
    /// `id | player_id | pk`, `full_name | name | first_name + last_name`,
    /// `phone_number | phone`, and an explicit `is_playing` flag or a textual
    /// `state`/`status` equal to `"playing"`. Rows without any id are rejected.
    pub fn from_raw(row: &Value) -> Option<Self> {
        let id = ["id", "player_id", "pk"]
            .iter()
            .find_map(|key| row.get(*key).and_then(Id::from_value))?;

        let full_name = row
            .get("full_name")
            .filter(|v| !v.is_null())
            .or_else(|| row.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                let first = row.get("first_name").and_then(|v| v.as_str()).unwrap_or("");
                let last = row.get("last_name").and_then(|v| v.as_str()).unwrap_or("");
                format!("{} {}", first, last).trim().to_string()
            });

        let phone_number = row
            .get("phone_number")
            .filter(|v| !v.is_null())
            .or_else(|| row.get("phone"))
            .and_then(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .or_else(|| v.as_i64().map(|n| n.to_string()))
            });

        let state = row
            .get("state")
            .filter(|v| !v.is_null())
            .or_else(|| row.get("status"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let is_playing = match row.get("is_playing").and_then(|v| v.as_bool()) {
            Some(flag) => Some(flag),
            None if !state.is_empty() => Some(state == "playing"),
            None => None,
        };

        Some(Self {
            id,
            full_name,
            phone_number,
            is_playing,
        })
    }
}

/// Body of `POST /players`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerDraft {
    pub full_name: String,
    pub phone_number: Option<String>,
}

/// Membership link between a player and an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub id: Id,
    pub event_id: Id,
    pub player_id: Id,
    #[serde(default, with = "crate::time::lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub player: Player,
}

/// Body of `POST /events/{id}/registrations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationRequest {
    pub player_id: Id,
}

//! Session persistence between command invocations.

use pingpong_wire::{Agent, Id};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// What survives a restart: the signed-in agent and the active event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SavedSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_event_id: Option<Id>,
}

impl SavedSession {
    /// Read the session file. A missing or unreadable file yields an empty session.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<SavedSession>(&content) {
                Ok(saved) => {
                    tracing::debug!("Loaded session from {}", path.display());
                    saved
                }
                Err(e) => {
                    tracing::warn!("Failed to parse session file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read session file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!("Saved session to {}", path.display());
        Ok(())
    }

    pub fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

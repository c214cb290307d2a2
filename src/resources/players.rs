use pingpong_wire::{BulkImportResult, Id, Player, PlayerDraft};
use tracing::warn;

use crate::api::{segment, ResponseBody};
use crate::cache::QueryKey;
use crate::error::{HubError, Result};
use crate::state::AppState;

pub struct Players<'a> {
    state: &'a AppState,
}

impl<'a> Players<'a> {
    pub(crate) fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Global roster; polled, so every read goes to the server.
    pub async fn list(&self) -> Result<Vec<Player>> {
        let policy = self.state.policies.players;
        self.state
            .cache
            .query(QueryKey::Players, policy.stale_time, || self.fetch())
            .await
    }

    pub async fn fetch(&self) -> Result<Vec<Player>> {
        let rows = self.state.api.get("/players").await?.into_rows();
        let total = rows.len();
        let players: Vec<Player> = rows.iter().filter_map(Player::from_raw).collect();
        if players.len() < total {
            warn!(skipped = total - players.len(), "player rows without an id were skipped");
        }
        Ok(players)
    }

    pub async fn create(&self, draft: &PlayerDraft) -> Result<Player> {
        let body = self.state.api.post("/players", draft).await?;
        self.state.cache.invalidate(&QueryKey::Players).await;
        match body {
            ResponseBody::Json(row) => Player::from_raw(&row)
                .ok_or_else(|| HubError::Decode("player response without an id".to_string())),
            other => other.into_json(),
        }
    }

    pub async fn delete(&self, player_id: &Id) -> Result<()> {
        self.state
            .api
            .delete(&format!("/players/id/{}", segment(player_id)))
            .await?;
        self.state.cache.invalidate(&QueryKey::Players).await;
        Ok(())
    }

    /// Upload a CSV or Excel file; parsing happens server-side.
    pub async fn import(&self, file_name: &str, bytes: Vec<u8>) -> Result<BulkImportResult> {
        let result = self
            .state
            .api
            .upload("/players/import", file_name, bytes)
            .await?
            .into_json()?;
        self.state.cache.invalidate(&QueryKey::Players).await;
        Ok(result)
    }
}

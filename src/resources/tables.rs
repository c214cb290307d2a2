use pingpong_wire::{
    AssignRequest, Id, MoveAssignmentRequest, SeedRequest, SwapTablesRequest, Table,
};

use super::require_active_event;
use crate::api::segment;
use crate::cache::QueryKey;
use crate::error::Result;
use crate::state::AppState;

/// Table board and assignment actions of the active event.
pub struct Tables<'a> {
    state: &'a AppState,
}

impl<'a> Tables<'a> {
    pub(crate) fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<Table>> {
        let event_id = require_active_event(self.state).await?;
        let policy = self.state.policies.tables;
        self.state
            .cache
            .query(QueryKey::Tables(event_id.clone()), policy.stale_time, || {
                self.fetch_for(&event_id)
            })
            .await
    }

    pub async fn fetch_for(&self, event_id: &Id) -> Result<Vec<Table>> {
        self.state
            .api
            .get_json(&format!("/events/{}/tables/board", segment(event_id)))
            .await
    }

    pub async fn create_at(&self, position: u32) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.state
            .api
            .post_empty(&format!("/events/{}/tables/pos/{}", segment(&event_id), position))
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    pub async fn delete(&self, table_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.state
            .api
            .delete(&self.table_path(&event_id, table_id, ""))
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    pub async fn seed(&self, request: SeedRequest) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.seed_for(&event_id, request).await
    }

    /// Seed tables of an explicit event (used right after creating one).
    pub async fn seed_for(&self, event_id: &Id, request: SeedRequest) -> Result<()> {
        self.state
            .api
            .post(&format!("/events/{}/tables/seed", segment(event_id)), &request)
            .await?;
        self.invalidate_board(event_id).await;
        Ok(())
    }

    /// Seat two players. `is_playing` changes too, so the roster is invalidated.
    pub async fn assign(&self, table_id: &Id, players: [Id; 2], notify: bool) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        let [player1_id, player2_id] = players;
        let body = AssignRequest {
            player1_id,
            player2_id,
            notify,
        };
        self.state
            .api
            .post(&self.table_path(&event_id, table_id, "/assign"), &body)
            .await?;
        self.invalidate_board_and_roster(&event_id).await;
        Ok(())
    }

    pub async fn free(&self, table_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.state
            .api
            .post_empty(&self.table_path(&event_id, table_id, "/free"))
            .await?;
        self.invalidate_board_and_roster(&event_id).await;
        Ok(())
    }

    pub async fn notify(&self, table_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.state
            .api
            .post_empty(&self.table_path(&event_id, table_id, "/notify"))
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    pub async fn start_timer(&self, table_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        self.state
            .api
            .post_empty(&self.table_path(&event_id, table_id, "/start-timer"))
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    pub async fn move_assignment(&self, assignment_id: &Id, new_table_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        let body = MoveAssignmentRequest {
            new_table_id: new_table_id.clone(),
        };
        self.state
            .api
            .post(
                &format!(
                    "/events/{}/assignments/{}/move",
                    segment(&event_id),
                    segment(assignment_id)
                ),
                &body,
            )
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    pub async fn swap(&self, table_a_id: &Id, table_b_id: &Id) -> Result<()> {
        let event_id = require_active_event(self.state).await?;
        let body = SwapTablesRequest {
            table_a_id: table_a_id.clone(),
            table_b_id: table_b_id.clone(),
        };
        self.state
            .api
            .post(&format!("/events/{}/tables/swap", segment(&event_id)), &body)
            .await?;
        self.invalidate_board(&event_id).await;
        Ok(())
    }

    fn table_path(&self, event_id: &Id, table_id: &Id, action: &str) -> String {
        format!(
            "/events/{}/tables/{}{}",
            segment(event_id),
            segment(table_id),
            action
        )
    }

    async fn invalidate_board(&self, event_id: &Id) {
        self.state
            .cache
            .invalidate(&QueryKey::Tables(event_id.clone()))
            .await;
    }

    async fn invalidate_board_and_roster(&self, event_id: &Id) {
        self.state
            .cache
            .invalidate_all(&[QueryKey::Tables(event_id.clone()), QueryKey::Players])
            .await;
    }
}

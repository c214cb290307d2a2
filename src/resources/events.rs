use pingpong_wire::{Event, EventDraft, Id};

use crate::api::segment;
use crate::cache::QueryKey;
use crate::error::Result;
use crate::state::AppState;

pub struct Events<'a> {
    state: &'a AppState,
}

impl<'a> Events<'a> {
    pub(crate) fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Cached event list (30 s stale window by default).
    pub async fn list(&self) -> Result<Vec<Event>> {
        let policy = self.state.policies.events;
        self.state
            .cache
            .query(QueryKey::Events, policy.stale_time, || self.fetch())
            .await
    }

    pub async fn fetch(&self) -> Result<Vec<Event>> {
        self.state.api.get_json("/events").await
    }

    pub async fn create(&self, draft: &EventDraft) -> Result<Event> {
        let event: Event = self.state.api.post("/events", draft).await?.into_json()?;
        self.state.cache.invalidate(&QueryKey::Events).await;
        Ok(event)
    }

    /// Delete an event. Deleting the active event leaves no event selected.
    pub async fn delete(&self, event_id: &Id) -> Result<()> {
        self.state
            .api
            .delete(&format!("/events/{}", segment(event_id)))
            .await?;
        self.state.cache.invalidate(&QueryKey::Events).await;

        if self.state.active_event.id().await.as_ref() == Some(event_id) {
            self.state.active_event.set_active(None).await;
        }
        Ok(())
    }
}

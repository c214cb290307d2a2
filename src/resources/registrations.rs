use pingpong_wire::{Id, Registration, RegistrationRequest};

use super::require_active_event;
use crate::api::segment;
use crate::cache::QueryKey;
use crate::error::Result;
use crate::state::AppState;

pub struct Registrations<'a> {
    state: &'a AppState,
}

impl<'a> Registrations<'a> {
    pub(crate) fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Registrations of the active event (10 s stale window by default).
    pub async fn list(&self) -> Result<Vec<Registration>> {
        let event_id = require_active_event(self.state).await?;
        let policy = self.state.policies.registrations;
        self.state
            .cache
            .query(QueryKey::Registrations(event_id.clone()), policy.stale_time, || {
                self.fetch_for(&event_id)
            })
            .await
    }

    pub async fn fetch_for(&self, event_id: &Id) -> Result<Vec<Registration>> {
        self.state
            .api
            .get_json(&format!("/events/{}/registrations", segment(event_id)))
            .await
    }

    pub async fn register(&self, player_id: &Id) -> Result<Registration> {
        let event_id = require_active_event(self.state).await?;
        let body = RegistrationRequest {
            player_id: player_id.clone(),
        };
        let registration = self
            .state
            .api
            .post(&format!("/events/{}/registrations", segment(&event_id)), &body)
            .await?
            .into_json()?;
        self.state
            .cache
            .invalidate_all(&[QueryKey::Registrations(event_id), QueryKey::Players])
            .await;
        Ok(registration)
    }

    /// Remove a registration from `event_id`, or from the active event when not given.
    pub async fn unregister(&self, registration_id: &Id, event_id: Option<&Id>) -> Result<()> {
        let target = match event_id {
            Some(id) => id.clone(),
            None => require_active_event(self.state).await?,
        };
        self.state
            .api
            .delete(&format!(
                "/events/{}/registrations/{}",
                segment(&target),
                segment(registration_id)
            ))
            .await?;
        self.state
            .cache
            .invalidate(&QueryKey::Registrations(target))
            .await;
        Ok(())
    }
}

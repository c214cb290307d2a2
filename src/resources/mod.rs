//! Resource accessors.
//!
//! One accessor per server resource. Reads go through the [`QueryCache`]
//! under the resource's [`QueryPolicy`]; writes wait for the server and then
//! invalidate exactly the cached reads they may have changed. Nothing is
//! updated optimistically.
//!
//! [`QueryCache`]: crate::cache::QueryCache
//! [`QueryPolicy`]: crate::cache::QueryPolicy

mod events;
mod players;
mod registrations;
mod tables;

pub use events::Events;
pub use players::Players;
pub use registrations::Registrations;
pub use tables::Tables;

use pingpong_wire::Id;

use crate::cache::QueryKey;
use crate::error::{HubError, Result};
use crate::state::AppState;

/// Active event id, or [`HubError::NoActiveEvent`].
pub(crate) async fn require_active_event(state: &AppState) -> Result<Id> {
    state.active_event.id().await.ok_or(HubError::NoActiveEvent)
}

/// Fetch `key` from the server and replace the cached value, bypassing staleness.
pub async fn refresh(state: &AppState, key: &QueryKey) -> Result<()> {
    match key {
        QueryKey::Events => {
            let events = state.events().fetch().await?;
            state.cache.store(key.clone(), events).await;
        }
        QueryKey::Players => {
            let players = state.players().fetch().await?;
            state.cache.store(key.clone(), players).await;
        }
        QueryKey::Tables(event_id) => {
            let tables = state.tables().fetch_for(event_id).await?;
            state.cache.store(key.clone(), tables).await;
        }
        QueryKey::Registrations(event_id) => {
            let registrations = state.registrations().fetch_for(event_id).await?;
            state.cache.store(key.clone(), registrations).await;
        }
    }
    Ok(())
}

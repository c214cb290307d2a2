//! The event the dashboard is currently operating on.

use pingpong_wire::{Event, Id};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::selection::SelectionStore;
use crate::bus::{HubEvent, SharedBus};

#[derive(Debug, Clone, Default)]
struct ActiveEvent {
    id: Option<Id>,
    /// Last fetched record for `id`; absent right after a session restore
    event: Option<Event>,
}

/// Active event handle. Every change empties the player selection.
#[derive(Clone)]
pub struct ActiveEventStore {
    state: Arc<RwLock<ActiveEvent>>,
    selection: SelectionStore,
    bus: SharedBus,
}

impl ActiveEventStore {
    pub fn new(bus: SharedBus, selection: SelectionStore) -> Self {
        Self {
            state: Arc::new(RwLock::new(ActiveEvent::default())),
            selection,
            bus,
        }
    }

    /// Select `event` (or none). The selection is cleared even when the id is unchanged.
    pub async fn set_active(&self, event: Option<Event>) {
        let event_id = event.as_ref().map(|e| e.id.clone());
        let changed = {
            let mut state = self.state.write().await;
            let changed = state.id != event_id;
            *state = ActiveEvent {
                id: event_id.clone(),
                event,
            };
            changed
        };
        self.selection.clear().await;
        if changed {
            info!(event_id = ?event_id.as_ref().map(|id| id.to_string()), "active event changed");
        }
        self.bus.publish(HubEvent::ActiveEventChanged { event_id });
    }

    /// Remember an id from a saved session until the event list is fetched.
    pub async fn restore(&self, id: Id) {
        let mut state = self.state.write().await;
        state.id = Some(id);
        state.event = None;
    }

    pub async fn id(&self) -> Option<Id> {
        self.state.read().await.id.clone()
    }

    pub async fn get(&self) -> Option<Event> {
        self.state.read().await.event.clone()
    }

    /// Reconcile against a fresh event list: keep the current event when it
    /// still exists, otherwise fall back to the first event (or none).
    pub async fn ensure_within(&self, events: &[Event]) -> Option<Event> {
        let current = self.id().await;
        let still_listed = current
            .as_ref()
            .and_then(|id| events.iter().find(|e| &e.id == id));

        match still_listed {
            Some(event) => {
                let event = event.clone();
                // Same id; refresh the record without touching the selection
                self.state.write().await.event = Some(event.clone());
                Some(event)
            }
            None => {
                let fallback = events.first().cloned();
                if current.is_some() || fallback.is_some() {
                    self.set_active(fallback.clone()).await;
                }
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::create_bus;
    use pingpong_wire::Player;

    fn event(id: i64) -> Event {
        Event {
            id: Id::from(id),
            name: format!("Event {}", id),
            tables_count: 4,
            location: None,
            starts_at: None,
            created_at: None,
        }
    }

    fn player(id: i64) -> Player {
        Player {
            id: Id::from(id),
            full_name: format!("P{}", id),
            phone_number: None,
            is_playing: None,
        }
    }

    fn stores() -> (ActiveEventStore, SelectionStore) {
        let bus = create_bus();
        let selection = SelectionStore::new(bus.clone());
        (ActiveEventStore::new(bus, selection.clone()), selection)
    }

    #[tokio::test]
    async fn test_changing_event_clears_selection() {
        let (active, selection) = stores();
        active.set_active(Some(event(1))).await;
        selection.toggle(&player(1)).await;
        selection.toggle(&player(2)).await;

        active.set_active(Some(event(2))).await;
        assert!(selection.is_empty().await);

        selection.toggle(&player(1)).await;
        active.set_active(None).await;
        assert!(selection.is_empty().await);
        assert_eq!(active.id().await, None);
    }

    #[tokio::test]
    async fn test_defaults_to_first_event() {
        let (active, _) = stores();
        let chosen = active.ensure_within(&[event(5), event(6)]).await;
        assert_eq!(chosen.map(|e| e.id), Some(Id::from(5)));
        assert_eq!(active.id().await, Some(Id::from(5)));
    }

    #[tokio::test]
    async fn test_keeps_listed_event_and_drops_vanished_one() {
        let (active, _) = stores();
        active.set_active(Some(event(6))).await;
        active.ensure_within(&[event(5), event(6)]).await;
        assert_eq!(active.id().await, Some(Id::from(6)));

        active.ensure_within(&[event(5)]).await;
        assert_eq!(active.id().await, Some(Id::from(5)));

        active.ensure_within(&[]).await;
        assert_eq!(active.get().await, None);
    }

    #[tokio::test]
    async fn test_restored_id_resolves_against_list() {
        let (active, _) = stores();
        active.restore(Id::from(6)).await;
        assert_eq!(active.get().await, None);

        let resolved = active.ensure_within(&[event(5), event(6)]).await;
        assert_eq!(resolved.map(|e| e.name), Some("Event 6".to_string()));
    }
}

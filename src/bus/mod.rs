//! In-process notification bus.
//!
//! Stores, the query cache and the HTTP client publish here; the poller and
//! the live dashboard subscribe. Publishing never blocks and never fails when
//! nobody is listening.

use pingpong_wire::Id;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::cache::QueryKey;

const BUS_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    /// A cached read was marked stale by a successful write
    QueryInvalidated { key: QueryKey },
    /// A cached read was replaced with fresh server data
    QueryRefreshed { key: QueryKey },
    /// A background refresh failed
    PollFailed { key: QueryKey, error: String },

    LoggedIn { agent_id: Id },
    /// Explicit logout or a 401 from the service
    LoggedOut { reason: String },

    ActiveEventChanged { event_id: Option<Id> },
    SelectionChanged { count: usize },

    ShuttingDown,
}

impl HubEvent {
    /// Event type as a string (for logging)
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::QueryInvalidated { .. } => "query_invalidated",
            Self::QueryRefreshed { .. } => "query_refreshed",
            Self::PollFailed { .. } => "poll_failed",
            Self::LoggedIn { .. } => "logged_in",
            Self::LoggedOut { .. } => "logged_out",
            Self::ActiveEventChanged { .. } => "active_event_changed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::ShuttingDown => "shutting_down",
        }
    }

    /// Whether a rendered view should be redrawn after this event.
    pub fn affects_view(&self) -> bool {
        !matches!(self, Self::QueryInvalidated { .. } | Self::ShuttingDown)
    }
}

pub struct EventBus {
    tx: broadcast::Sender<HubEvent>,
}

impl EventBus {
    pub fn publish(&self, event: HubEvent) {
        tracing::trace!(event = event.event_type(), "bus publish");
        // No receivers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

pub type SharedBus = Arc<EventBus>;

pub fn create_bus() -> SharedBus {
    let (tx, _) = broadcast::channel(BUS_CAPACITY);
    Arc::new(EventBus { tx })
}

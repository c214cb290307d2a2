//! Application state shared by every page, command and background task.

use std::path::Path;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::bus::{create_bus, SharedBus};
use crate::cache::{QueryCache, QueryPolicies};
use crate::config::HubConfig;
use crate::error::Result;
use crate::resources::{Events, Players, Registrations, Tables};
use crate::store::{ActiveEventStore, AuthStore, SavedSession, SelectionStore};

/// Explicit context object; clone it into tasks instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HubConfig>,
    pub bus: SharedBus,
    pub cache: QueryCache,
    pub policies: QueryPolicies,
    pub auth: AuthStore,
    pub selection: SelectionStore,
    pub active_event: ActiveEventStore,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: HubConfig) -> Result<Self> {
        let bus = create_bus();
        let cache = QueryCache::new(bus.clone());
        let auth = AuthStore::new(bus.clone());
        let selection = SelectionStore::new(bus.clone());
        let active_event = ActiveEventStore::new(bus.clone(), selection.clone());
        let api = ApiClient::new(&config, auth.clone(), cache.clone())?;

        Ok(Self {
            policies: QueryPolicies::from_config(&config.cache),
            config: Arc::new(config),
            bus,
            cache,
            auth,
            selection,
            active_event,
            api,
        })
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn players(&self) -> Players<'_> {
        Players::new(self)
    }

    pub fn tables(&self) -> Tables<'_> {
        Tables::new(self)
    }

    pub fn registrations(&self) -> Registrations<'_> {
        Registrations::new(self)
    }

    /// Reinstate a saved session. Without a token nothing is restored.
    pub async fn restore_session(&self, saved: SavedSession) {
        if let (Some(agent), Some(token)) = (saved.agent, saved.token) {
            self.auth.restore(agent, token).await;
            if let Some(event_id) = saved.active_event_id {
                self.active_event.restore(event_id).await;
            }
        }
    }

    pub async fn session_snapshot(&self) -> SavedSession {
        let auth = self.auth.snapshot().await;
        if !auth.is_authenticated() {
            return SavedSession::default();
        }
        SavedSession {
            token: auth.token,
            agent: auth.agent,
            active_event_id: self.active_event.id().await,
        }
    }

    /// Save the session after a command, or delete the file once signed out.
    pub async fn persist_session(&self, path: &Path) -> Result<()> {
        let session = self.session_snapshot().await;
        if session.is_authenticated() {
            session.save(path)
        } else {
            SavedSession::clear(path)
        }
    }
}

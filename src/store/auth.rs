//! Authenticated agent and bearer token.

use pingpong_wire::{Agent, AgentLoginResponse};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::bus::{HubEvent, SharedBus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub agent: Option<Agent>,
    pub token: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle; clones see the same session.
#[derive(Clone)]
pub struct AuthStore {
    state: Arc<RwLock<AuthState>>,
    bus: SharedBus,
}

impl AuthStore {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::default())),
            bus,
        }
    }

    pub async fn login(&self, response: AgentLoginResponse) {
        let agent_id = response.agent.id.clone();
        info!(agent = %response.agent.email, "agent signed in");
        *self.state.write().await = AuthState {
            agent: Some(response.agent),
            token: Some(response.token),
        };
        self.bus.publish(HubEvent::LoggedIn { agent_id });
    }

    /// Reinstate a saved session without announcing a new sign-in.
    pub async fn restore(&self, agent: Agent, token: String) {
        *self.state.write().await = AuthState {
            agent: Some(agent),
            token: Some(token),
        };
    }

    /// Clear the session. Returns whether there was one.
    pub async fn logout(&self, reason: &str) -> bool {
        let was_authenticated = {
            let mut state = self.state.write().await;
            let was = state.is_authenticated();
            *state = AuthState::default();
            was
        };
        if was_authenticated {
            info!(reason, "agent signed out");
            self.bus.publish(HubEvent::LoggedOut {
                reason: reason.to_string(),
            });
        }
        was_authenticated
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn agent(&self) -> Option<Agent> {
        self.state.read().await.agent.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::create_bus;
    use pingpong_wire::Id;

    fn login_response() -> AgentLoginResponse {
        AgentLoginResponse {
            agent: Agent {
                id: Id::from(1),
                full_name: "Desk Agent".to_string(),
                email: "a@b.com".to_string(),
                created_at: None,
            },
            token: "tok-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_sets_agent_and_token() {
        let store = AuthStore::new(create_bus());
        assert!(!store.is_authenticated().await);

        store.login(login_response()).await;

        let state = store.snapshot().await;
        assert_eq!(state.token.as_deref(), Some("tok-123"));
        assert_eq!(state.agent.unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn test_logout_clears_both() {
        let bus = create_bus();
        let mut rx = bus.subscribe();
        let store = AuthStore::new(bus);
        store.login(login_response()).await;

        assert!(store.logout("manual").await);
        assert_eq!(store.snapshot().await, AuthState::default());
        // Second logout is a no-op
        assert!(!store.logout("manual").await);

        assert!(matches!(rx.recv().await.unwrap(), HubEvent::LoggedIn { .. }));
        assert!(matches!(rx.recv().await.unwrap(), HubEvent::LoggedOut { .. }));
    }
}

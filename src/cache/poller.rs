//! Background refresh of polled queries.
//!
//! The player roster and the table board of the active event approximate live
//! state by refetching on a fixed interval. An invalidation of one of those
//! keys triggers an immediate refetch instead of waiting for the next tick.

use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::QueryKey;
use crate::bus::HubEvent;
use crate::resources;
use crate::state::AppState;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct Poller {
    state: AppState,
    shutdown: CancellationToken,
}

impl Poller {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the polling task when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Polled keys for the current context. Tables need an active event.
    pub async fn polled_keys(&self) -> Vec<QueryKey> {
        let mut keys = vec![QueryKey::Players];
        if let Some(event_id) = self.state.active_event.id().await {
            keys.push(QueryKey::Tables(event_id));
        }
        keys.retain(|key| self.state.policies.is_polled(key));
        keys
    }

    /// Refresh every polled key once. Returns how many refreshes succeeded.
    pub async fn poll_once(&self) -> usize {
        if !self.state.auth.is_authenticated().await {
            debug!("not signed in, skipping poll");
            return 0;
        }
        let mut refreshed = 0;
        for key in self.polled_keys().await {
            if self.refresh(&key).await {
                refreshed += 1;
            }
        }
        refreshed
    }

    async fn refresh(&self, key: &QueryKey) -> bool {
        match resources::refresh(&self.state, key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "poll failed");
                self.state.bus.publish(HubEvent::PollFailed {
                    key: key.clone(),
                    error: e.to_string(),
                });
                false
            }
        }
    }

    fn period(&self) -> Duration {
        let policies = &self.state.policies;
        [policies.players, policies.tables]
            .iter()
            .filter_map(|policy| policy.refetch_interval)
            .min()
            .unwrap_or(Duration::from_secs(self.state.config.cache.poll_interval_secs))
            .max(MIN_POLL_INTERVAL)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        let mut events = self.state.bus.subscribe();
        let mut poll_interval = interval(self.period());
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period_ms = self.period().as_millis() as u64, "poller started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("poller shutting down");
                    break;
                }
                _ = poll_interval.tick() => {
                    self.poll_once().await;
                }
                received = events.recv() => match received {
                    Ok(HubEvent::QueryInvalidated { key }) => {
                        if self.polled_keys().await.contains(&key)
                            && self.state.auth.is_authenticated().await
                        {
                            debug!(key = %key, "refetching invalidated key");
                            self.refresh(&key).await;
                        }
                    }
                    Ok(HubEvent::ShuttingDown) => break,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "poller lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }

        info!("poller stopped");
    }
}

//! Query cache.
//!
//! Every read of server state goes through [`QueryCache::query`], keyed by
//! resource name and, for event-scoped resources, the event id. Writes never
//! touch cached data directly: they [`invalidate`](QueryCache::invalidate) the
//! keys they affect and the next read (or the poller) refetches.

pub mod poller;

use pingpong_wire::{Event, Id, Player, Registration, Table};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::bus::{HubEvent, SharedBus};
use crate::config::CacheConfig;
use crate::error::Result;

pub use poller::Poller;

/// Identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Events,
    Players,
    Tables(Id),
    Registrations(Id),
}

impl QueryKey {
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Players => "players",
            Self::Tables(_) => "tables",
            Self::Registrations(_) => "registrations",
        }
    }

    pub fn event_id(&self) -> Option<&Id> {
        match self {
            Self::Tables(id) | Self::Registrations(id) => Some(id),
            Self::Events | Self::Players => None,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event_id() {
            Some(id) => write!(f, "{}/{}", self.resource(), id),
            None => f.write_str(self.resource()),
        }
    }
}

/// Cached payloads.
#[derive(Debug, Clone)]
pub enum QueryData {
    Events(Vec<Event>),
    Players(Vec<Player>),
    Tables(Vec<Table>),
    Registrations(Vec<Registration>),
}

/// Values that can live in the cache.
pub trait QueryValue: Clone + Sized {
    fn into_data(self) -> QueryData;
    fn from_data(data: &QueryData) -> Option<Self>;
}

macro_rules! query_value {
    ($ty:ty, $variant:ident) => {
        impl QueryValue for Vec<$ty> {
            fn into_data(self) -> QueryData {
                QueryData::$variant(self)
            }

            fn from_data(data: &QueryData) -> Option<Self> {
                match data {
                    QueryData::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

query_value!(Event, Events);
query_value!(Player, Players);
query_value!(Table, Tables);
query_value!(Registration, Registrations);

/// Staleness window and optional polling interval of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub stale_time: Duration,
    pub refetch_interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicies {
    pub events: QueryPolicy,
    pub players: QueryPolicy,
    pub tables: QueryPolicy,
    pub registrations: QueryPolicy,
}

impl QueryPolicies {
    pub fn from_config(config: &CacheConfig) -> Self {
        let poll = Some(Duration::from_secs(config.poll_interval_secs));
        Self {
            events: QueryPolicy {
                stale_time: Duration::from_secs(config.events_stale_secs),
                refetch_interval: None,
            },
            players: QueryPolicy {
                stale_time: Duration::ZERO,
                refetch_interval: poll,
            },
            tables: QueryPolicy {
                stale_time: Duration::ZERO,
                refetch_interval: poll,
            },
            registrations: QueryPolicy {
                stale_time: Duration::from_secs(config.registrations_stale_secs),
                refetch_interval: None,
            },
        }
    }

    pub fn for_key(&self, key: &QueryKey) -> QueryPolicy {
        match key {
            QueryKey::Events => self.events,
            QueryKey::Players => self.players,
            QueryKey::Tables(_) => self.tables,
            QueryKey::Registrations(_) => self.registrations,
        }
    }

    pub fn is_polled(&self, key: &QueryKey) -> bool {
        self.for_key(key).refetch_interval.is_some()
    }
}

impl Default for QueryPolicies {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

struct Entry {
    data: QueryData,
    fetched_at: Instant,
    invalidated: bool,
}

/// Shared cache of server reads. Cloning shares the same entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    bus: SharedBus,
}

impl QueryCache {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            bus,
        }
    }

    /// Cached value regardless of freshness.
    pub async fn peek<T: QueryValue>(&self, key: &QueryKey) -> Option<T> {
        self.entries
            .read()
            .await
            .get(key)
            .and_then(|entry| T::from_data(&entry.data))
    }

    pub async fn is_fresh(&self, key: &QueryKey, stale_time: Duration) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .map(|entry| !entry.invalidated && entry.fetched_at.elapsed() < stale_time)
            .unwrap_or(false)
    }

    pub async fn is_invalidated(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .map(|entry| entry.invalidated)
            .unwrap_or(false)
    }

    /// Serve `key` from the cache while fresh, otherwise run `fetch` and store the result.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, stale_time: Duration, fetch: F) -> Result<T>
    where
        T: QueryValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.is_fresh(&key, stale_time).await {
            if let Some(value) = self.peek::<T>(&key).await {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
        }

        debug!(key = %key, "cache miss, fetching");
        let value = fetch().await?;
        self.store(key, value.clone()).await;
        Ok(value)
    }

    pub async fn store<T: QueryValue>(&self, key: QueryKey, value: T) {
        self.entries.write().await.insert(
            key.clone(),
            Entry {
                data: value.into_data(),
                fetched_at: Instant::now(),
                invalidated: false,
            },
        );
        self.bus.publish(HubEvent::QueryRefreshed { key });
    }

    /// Mark `key` stale. Published even when nothing is cached yet so polled
    /// views refetch immediately.
    pub async fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.entries.write().await.get_mut(key) {
            entry.invalidated = true;
        }
        debug!(key = %key, "invalidated");
        self.bus
            .publish(HubEvent::QueryInvalidated { key: key.clone() });
    }

    pub async fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(key).await;
        }
    }

    /// Drop every entry (logout).
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "query cache cleared");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

//! Main dashboard: events, roster, table board and summary statistics.

use chrono::{DateTime, Utc};
use pingpong_wire::{Agent, Event, Player, Registration, Table};

use crate::app::components::layout::heading;
use crate::app::components::{event_list, event_players, layout, player_list, table_board};
use crate::app::QueryState;
use crate::cache::{QueryKey, QueryValue};
use crate::state::AppState;
use crate::store::Selection;
use crate::workflow::{clock, Gates};

/// Headline numbers shown above the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub events: usize,
    pub tables: usize,
    pub free_tables: usize,
    pub busy_tables: usize,
    pub running_matches: usize,
    pub players: usize,
    pub playing: usize,
    pub registered: usize,
    pub selected: usize,
}

impl Summary {
    pub fn derive(
        events: &[Event],
        tables: &[Table],
        players: &[Player],
        registrations: &[Registration],
        selected: usize,
    ) -> Self {
        let free_tables = tables.iter().filter(|t| t.is_free()).count();
        Self {
            events: events.len(),
            tables: tables.len(),
            free_tables,
            busy_tables: tables.len() - free_tables,
            running_matches: tables
                .iter()
                .filter(|t| t.has_active_assignment() && t.started_at.is_some())
                .count(),
            players: players.len(),
            playing: players.iter().filter(|p| p.is_playing == Some(true)).count(),
            registered: registrations.len(),
            selected,
        }
    }

    pub fn render(&self) -> String {
        [
            heading("Summary", None),
            format!(
                "Tables {} ({} free, {} busy, {} running)",
                self.tables, self.free_tables, self.busy_tables, self.running_matches
            ),
            format!(
                "Registered {} · Roster {} ({} playing) · Events {} · Selected {}",
                self.registered, self.players, self.playing, self.events, self.selected
            ),
        ]
        .join("\n")
    }
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub agent: Option<Agent>,
    pub events: QueryState<Vec<Event>>,
    pub active_event: Option<Event>,
    pub players: QueryState<Vec<Player>>,
    pub tables: QueryState<Vec<Table>>,
    pub registrations: QueryState<Vec<Registration>>,
    pub selection: Selection,
}

impl Dashboard {
    /// Read every query through the cache. Failures become per-section states.
    pub async fn load(state: &AppState) -> Self {
        let events = QueryState::from_result(state.events().list().await);
        let active_event = match events.ready() {
            Some(list) => state.active_event.ensure_within(list).await,
            None => state.active_event.get().await,
        };

        let players = QueryState::from_result(state.players().list().await);
        let (tables, registrations) = if active_event.is_some() {
            (
                QueryState::from_result(state.tables().list().await),
                QueryState::from_result(state.registrations().list().await),
            )
        } else {
            (QueryState::Ready(Vec::new()), QueryState::Ready(Vec::new()))
        };

        Self {
            agent: state.auth.agent().await,
            events,
            active_event,
            players,
            tables,
            registrations,
            selection: state.selection.snapshot().await,
        }
    }

    /// Build from whatever is cached, without touching the network.
    pub async fn from_cache(state: &AppState) -> Self {
        async fn cached<T: QueryValue>(state: &AppState, key: QueryKey) -> QueryState<T> {
            state
                .cache
                .peek::<T>(&key)
                .await
                .map(QueryState::Ready)
                .unwrap_or(QueryState::Loading)
        }

        let active_event = state.active_event.get().await;
        let (tables, registrations) = match &active_event {
            Some(event) => (
                cached(state, QueryKey::Tables(event.id.clone())).await,
                cached(state, QueryKey::Registrations(event.id.clone())).await,
            ),
            None => (QueryState::Ready(Vec::new()), QueryState::Ready(Vec::new())),
        };

        Self {
            agent: state.auth.agent().await,
            events: cached(state, QueryKey::Events).await,
            active_event,
            players: cached(state, QueryKey::Players).await,
            tables,
            registrations,
            selection: state.selection.snapshot().await,
        }
    }

    pub fn summary(&self) -> Summary {
        let empty_events = Vec::new();
        let empty_tables = Vec::new();
        let empty_players = Vec::new();
        let empty_registrations = Vec::new();
        Summary::derive(
            self.events.ready().unwrap_or(&empty_events),
            self.tables.ready().unwrap_or(&empty_tables),
            self.players.ready().unwrap_or(&empty_players),
            self.registrations.ready().unwrap_or(&empty_registrations),
            self.selection.len(),
        )
    }

    pub fn gated_tables(&self) -> Vec<(Table, Gates)> {
        let has_event = self.active_event.is_some();
        self.tables
            .ready()
            .map(|tables| {
                tables
                    .iter()
                    .map(|t| (t.clone(), Gates::evaluate(t, self.selection.len(), has_event)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn render(&self, now: DateTime<Utc>) -> String {
        let active_id = self.active_event.as_ref().map(|e| &e.id);
        let board = match &self.tables {
            _ if self.active_event.is_none() => {
                format!("{}\nSelect an event to see its tables.", heading("Tables", None))
            }
            QueryState::Loading => format!("{}\nLoading tables…", heading("Tables", None)),
            QueryState::Failed(message) => format!("{}\n! {}", heading("Tables", None), message),
            QueryState::Ready(tables) if tables.is_empty() => format!(
                "{}\nNo tables yet. Generate them with `table seed`.",
                heading("Tables", None)
            ),
            QueryState::Ready(_) => format!(
                "{}\n{}",
                heading("Tables", None),
                table_board(&self.gated_tables(), now)
            ),
        };

        let title = self
            .active_event
            .as_ref()
            .map(|e| e.name.clone())
            .unwrap_or_else(|| "Dashboard".to_string());
        layout(
            &title,
            self.agent.as_ref(),
            &[
                self.summary().render(),
                event_list(&self.events, active_id),
                board,
                player_list(&self.players, &self.selection),
                event_players(self.active_event.as_ref(), &self.registrations),
            ],
        )
    }

    /// Whether any clock on the board is ticking.
    pub fn has_running_clock(&self, now: DateTime<Utc>) -> bool {
        self.tables
            .ready()
            .map(|tables| tables.iter().any(|t| clock::reading(t, now).is_some()))
            .unwrap_or(false)
    }
}

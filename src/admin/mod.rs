//! Operations console.
//!
//! Form-level admin actions: raw operator input is validated here, the
//! matching resource call is made, and the outcome is folded into a
//! [`Feedback`] value. No error escapes; the operator can always retry.

mod feedback;

pub use feedback::{Feedback, FeedbackVariant};

use pingpong_wire::{BulkImportResult, EventDraft, Id, Player, PlayerDraft, SeedRequest};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{HubError, Result};
use crate::state::AppState;
use crate::workflow::can_delete;

/// Event creation form.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub name: String,
    pub tables_count: String,
    pub location: Option<String>,
    pub starts_at: Option<String>,
    /// Generate `tables_count` tables right after the event is created
    pub auto_seed: bool,
}

/// Quick-fill form. Blank count means "the event's table count".
#[derive(Debug, Clone, Default)]
pub struct SeedForm {
    pub count: Option<String>,
    pub start_at: Option<String>,
    pub reset: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerForm {
    pub full_name: String,
    pub phone_number: String,
}

/// Result of a spreadsheet import: the banner plus the per-row notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub feedback: Feedback,
    pub result: Option<BulkImportResult>,
}

/// Positive integer from form input.
fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

pub struct AdminConsole<'a> {
    state: &'a AppState,
}

impl<'a> AdminConsole<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn active_event_id(&self) -> Option<Id> {
        self.state.active_event.id().await
    }

    pub async fn create_event(&self, form: &EventForm) -> Feedback {
        let name = form.name.trim();
        if name.is_empty() {
            return Feedback::error("Event name is required.");
        }
        let Some(count) = parse_positive(&form.tables_count) else {
            return Feedback::error("Provide a valid number of tables (greater than zero).");
        };
        let starts_at = match non_blank(form.starts_at.as_deref()) {
            Some(raw) => match pingpong_wire::time::parse_timestamp(&raw) {
                Some(ts) => Some(ts),
                None => return Feedback::error("Provide a valid start date and time."),
            },
            None => None,
        };

        let draft = EventDraft {
            name: name.to_string(),
            tables_count: count,
            starts_at,
            location: non_blank(form.location.as_deref()),
        };
        let created = match self.state.events().create(&draft).await {
            Ok(event) => event,
            Err(e) => return Feedback::from_error(&e),
        };
        info!(event = %created.name, id = %created.id, "event created");
        self.state.active_event.set_active(Some(created.clone())).await;

        if !form.auto_seed {
            return Feedback::success(format!("Event \"{}\" created.", created.name));
        }

        // The event stays even when seeding fails
        match self
            .state
            .tables()
            .seed_for(&created.id, SeedRequest::fresh(count))
            .await
        {
            Ok(()) => Feedback::success(format!(
                "Event \"{}\" created with {}.",
                created.name,
                plural(count as usize, "table")
            )),
            Err(e) => Feedback::error(format!(
                "Event \"{}\" created but seeding failed: {}",
                created.name, e
            )),
        }
    }

    /// Destructive; nothing is sent unless `confirmed`.
    pub async fn delete_event(&self, confirmed: bool) -> Feedback {
        let Some(event_id) = self.active_event_id().await else {
            return Feedback::error("Select an event before deleting.");
        };
        if !confirmed {
            let name = self
                .state
                .active_event
                .get()
                .await
                .map(|e| e.name)
                .unwrap_or_else(|| event_id.to_string());
            return Feedback::error(format!(
                "Delete event \"{}\" and all of its data? This cannot be undone. Confirm to proceed.",
                name
            ));
        }
        match self.state.events().delete(&event_id).await {
            Ok(()) => {
                info!(id = %event_id, "event deleted");
                Feedback::success("Event deleted.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    pub async fn create_table(&self, position: &str) -> Feedback {
        if self.active_event_id().await.is_none() {
            return Feedback::error("Select an event to manage tables.");
        }
        let Some(position) = parse_positive(position) else {
            return Feedback::error("Provide a valid table position.");
        };
        match self.state.tables().create_at(position).await {
            Ok(()) => {
                info!(position, "table created");
                Feedback::success(format!("Table {} created.", position))
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    pub async fn delete_table(&self, table_id: &str) -> Feedback {
        if self.active_event_id().await.is_none() {
            return Feedback::error("Select an event to manage tables.");
        }
        let table_id = table_id.trim();
        if table_id.is_empty() {
            return Feedback::error("Select a table to delete.");
        }
        let tables = match self.state.tables().list().await {
            Ok(tables) => tables,
            Err(e) => return Feedback::from_error(&e),
        };
        let id = Id::new(table_id);
        if let Some(table) = tables.iter().find(|t| t.id == id) {
            if !can_delete(table, true) {
                return Feedback::error("Free the table before deleting it.");
            }
        }
        match self.state.tables().delete(&id).await {
            Ok(()) => {
                info!(table = %id, "table deleted");
                Feedback::success("Table deleted.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    pub async fn seed_tables(&self, form: &SeedForm) -> Feedback {
        if self.active_event_id().await.is_none() {
            return Feedback::error("Select an event to manage tables.");
        }
        let count = match non_blank(form.count.as_deref()) {
            Some(raw) => match parse_positive(&raw) {
                Some(n) => Some(n),
                None => return Feedback::error("Provide a valid number of tables to generate."),
            },
            None => None,
        };
        let start_at = match non_blank(form.start_at.as_deref()) {
            Some(raw) => match parse_positive(&raw) {
                Some(n) => n,
                None => {
                    return Feedback::error("Provide a valid starting position (1 or greater).")
                }
            },
            None => 1,
        };

        let request = SeedRequest {
            count,
            start_at,
            reset: form.reset,
        };
        match self.state.tables().seed(request).await {
            Ok(()) => {
                info!(?count, start_at, reset = form.reset, "tables seeded");
                Feedback::success(if form.reset {
                    "Tables reset and generated."
                } else {
                    "Tables generated successfully."
                })
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    pub async fn create_player(&self, form: &PlayerForm) -> Feedback {
        let full_name = form.full_name.trim();
        if full_name.is_empty() {
            return Feedback::error("Player name is required.");
        }
        let phone = form.phone_number.trim();
        if phone.is_empty() {
            return Feedback::error("Player phone is required.");
        }
        let draft = PlayerDraft {
            full_name: full_name.to_string(),
            phone_number: Some(phone.to_string()),
        };
        match self.state.players().create(&draft).await {
            Ok(player) => {
                info!(player = %player.full_name, "player added");
                Feedback::success("Player added.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    /// Destructive; nothing is sent unless `confirmed`.
    pub async fn delete_player(&self, player_id: &str, confirmed: bool) -> Feedback {
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Feedback::error("Select a player to delete.");
        }
        let id = Id::new(player_id);
        if !confirmed {
            let known = self
                .state
                .players()
                .list()
                .await
                .ok()
                .and_then(|players| players.into_iter().find(|p| p.id == id));
            return Feedback::error(match known {
                Some(player) => format!(
                    "Delete player \"{}\"? This cannot be undone. Confirm to proceed.",
                    player.full_name
                ),
                None => "Delete selected player? Confirm to proceed.".to_string(),
            });
        }
        match self.state.players().delete(&id).await {
            Ok(()) => {
                info!(player = %id, "player deleted");
                Feedback::success("Player deleted.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    /// Roster players not yet registered for the active event.
    pub async fn unregistered_players(&self) -> Result<Vec<Player>> {
        let registrations = self.state.registrations().list().await?;
        let registered: HashSet<Id> = registrations.into_iter().map(|r| r.player_id).collect();
        let players = self.state.players().list().await?;
        Ok(players
            .into_iter()
            .filter(|p| !registered.contains(&p.id))
            .collect())
    }

    pub async fn register_player(&self, player_id: &str) -> Feedback {
        if self.active_event_id().await.is_none() {
            return Feedback::error("Select an event to register players.");
        }
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Feedback::error("Select a player to register.");
        }
        match self.state.registrations().register(&Id::new(player_id)).await {
            Ok(registration) => {
                info!(player = %registration.player_id, "player registered");
                Feedback::success("Player registered for the event.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    /// Register each player in order, one request at a time. Earlier
    /// registrations stay committed when a later one fails.
    pub async fn register_many(&self, player_ids: &[Id]) -> Result<usize> {
        let total = player_ids.len();
        for (committed, player_id) in player_ids.iter().enumerate() {
            if let Err(e) = self.state.registrations().register(player_id).await {
                return Err(HubError::PartialBatch {
                    committed,
                    total,
                    failed: player_id.clone(),
                    message: format!(
                        "Registered {} of {} before player {} failed: {}",
                        committed, total, player_id, e
                    ),
                });
            }
        }
        Ok(total)
    }

    /// Bulk registration. The selection is pruned to players not yet registered.
    pub async fn register_bulk(&self, selection: &[Id]) -> Feedback {
        if self.active_event_id().await.is_none() {
            return Feedback::error("Select an event to register players.");
        }
        let eligible = match self.unregistered_players().await {
            Ok(players) => players.into_iter().map(|p| p.id).collect::<HashSet<_>>(),
            Err(e) => return Feedback::from_error(&e),
        };
        let mut seen = HashSet::new();
        let pruned: Vec<Id> = selection
            .iter()
            .filter(|id| eligible.contains(*id) && seen.insert((*id).clone()))
            .cloned()
            .collect();
        if pruned.len() < selection.len() {
            debug!(dropped = selection.len() - pruned.len(), "pruned bulk selection");
        }
        if pruned.is_empty() {
            return Feedback::error("Choose at least one player from the list.");
        }

        match self.register_many(&pruned).await {
            Ok(count) => {
                info!(count, "bulk registration complete");
                Feedback::success(format!("{} player(s) registered for the event.", count))
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    /// Remove a registration from `event_id`, or from the active event.
    pub async fn unregister(&self, registration_id: &str, event_id: Option<&Id>) -> Feedback {
        let registration_id = registration_id.trim();
        if registration_id.is_empty() {
            return Feedback::error("Select a registration to remove.");
        }
        match self
            .state
            .registrations()
            .unregister(&Id::new(registration_id), event_id)
            .await
        {
            Ok(()) => {
                info!(registration = registration_id, "registration removed");
                Feedback::success("Player removed from the event.")
            }
            Err(e) => Feedback::from_error(&e),
        }
    }

    pub async fn import_players(&self, file: Option<&Path>) -> ImportOutcome {
        let failed = |feedback: Feedback| ImportOutcome {
            feedback,
            result: None,
        };
        let Some(path) = file else {
            return failed(Feedback::error("Choose a CSV or Excel file to import."));
        };
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => return failed(Feedback::from_error(&HubError::from(e))),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "players.csv".to_string());

        match self.state.players().import(&file_name, bytes).await {
            Ok(result) => {
                info!(
                    total = result.total_rows,
                    created = result.created,
                    skipped = result.skipped,
                    "players imported"
                );
                ImportOutcome {
                    feedback: Feedback::for_import(&result),
                    result: Some(result),
                }
            }
            Err(e) => failed(Feedback::from_error(&e)),
        }
    }
}

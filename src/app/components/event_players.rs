//! Roster of the active event.

use pingpong_wire::{Event, Registration};

use super::layout::heading;
use crate::app::QueryState;

/// Registrations sorted by player name, case-insensitively.
pub fn sorted_roster(registrations: &[Registration]) -> Vec<&Registration> {
    let mut roster: Vec<&Registration> = registrations.iter().collect();
    roster.sort_by_key(|r| r.player.full_name.to_lowercase());
    roster
}

pub fn event_players(event: Option<&Event>, registrations: &QueryState<Vec<Registration>>) -> String {
    let Some(event) = event else {
        return format!(
            "{}\nSelect an event to see its registered players.",
            heading("Event players", None)
        );
    };
    let title = format!("Players · {}", event.name);

    let registrations = match registrations {
        QueryState::Loading => {
            return format!(
                "{}\nFetching players registered for this event.",
                heading(&title, Some("Loading…"))
            )
        }
        QueryState::Failed(message) => return format!("{}\n! {}", heading(&title, None), message),
        QueryState::Ready(registrations) => registrations,
    };

    let count = registrations.len();
    let mut lines = vec![heading(
        &title,
        Some(&format!("{} player{}", count, if count == 1 { "" } else { "s" })),
    )];
    if registrations.is_empty() {
        lines.push(
            "No players registered for this event yet. Register players from the roster or import new ones."
                .to_string(),
        );
        return lines.join("\n");
    }

    for registration in sorted_roster(registrations) {
        let phone = registration
            .player
            .phone_number
            .as_deref()
            .map(|p| format!("  {}", p))
            .unwrap_or_default();
        lines.push(format!(
            "  {}{}  (registration {})",
            registration.player.full_name, phone, registration.id
        ));
    }
    lines.join("\n")
}

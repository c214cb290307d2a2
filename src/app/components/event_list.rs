//! Event collection with the active event marked.

use pingpong_wire::{Event, Id};

use super::layout::heading;
use crate::app::QueryState;

pub fn event_list(events: &QueryState<Vec<Event>>, active: Option<&Id>) -> String {
    let events = match events {
        QueryState::Loading => {
            return format!("{}\nFetching events from the server.", heading("Events", Some("Loading…")))
        }
        QueryState::Failed(message) => return format!("{}\n! {}", heading("Events", None), message),
        QueryState::Ready(events) => events,
    };

    let mut lines = vec![heading("Events", Some(&format!("{} total", events.len())))];
    if events.is_empty() {
        lines.push("No events yet. Create one with `event create` to get started.".to_string());
        return lines.join("\n");
    }

    for event in events {
        let is_active = active == Some(&event.id);
        lines.push(format!(
            "{} [{}] {}",
            if is_active { "▶" } else { " " },
            event.id,
            event.name
        ));
        lines.push(format!(
            "      {}{}",
            event.summary_line(),
            if is_active { "  · active" } else { "" }
        ));
    }
    lines.join("\n")
}

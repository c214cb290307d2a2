//! One table of the board: status, seated players, clock and enabled actions.

use chrono::{DateTime, Utc};
use pingpong_wire::Table;

use crate::workflow::{clock, Gates, TablePhase};

pub fn table_card(table: &Table, gates: &Gates, now: DateTime<Utc>) -> String {
    let phase = TablePhase::of(table);
    let status = match phase {
        TablePhase::Free => "Free".to_string(),
        _ if matches!(table.status, pingpong_wire::TableStatus::Other(_)) => table.status.to_string(),
        other => format!("Busy · {}", other.label()),
    };

    let mut header = format!("{} [{}]  {}", table.display_name(), table.id, status);
    if let Some(elapsed) = clock::display(table, now) {
        header.push_str(&format!("  ⏱ {}", elapsed));
    }

    let players = table.players();
    let seated = if players.is_empty() {
        "—".to_string()
    } else {
        players
            .iter()
            .map(|p| p.full_name.as_str())
            .collect::<Vec<_>>()
            .join(" vs ")
    };

    let mut actions = Vec::new();
    if gates.assign {
        actions.push("assign");
    }
    if gates.notify {
        actions.push("notify");
    }
    if gates.start_timer {
        actions.push("start-timer");
    }
    if gates.free {
        actions.push("free");
    }
    if gates.delete {
        actions.push("delete");
    }

    let mut lines = vec![header, format!("    {}", seated)];
    if table.notified_at.is_some() && phase != TablePhase::Free {
        lines.push("    players notified".to_string());
    }
    if !actions.is_empty() {
        lines.push(format!("    actions: {}", actions.join(", ")));
    }
    lines.join("\n")
}

/// Board grid: one card per table, ordered by position.
pub fn table_board(tables: &[(Table, Gates)], now: DateTime<Utc>) -> String {
    let mut sorted: Vec<&(Table, Gates)> = tables.iter().collect();
    sorted.sort_by_key(|(t, _)| (t.position.unwrap_or(u32::MAX), t.id.to_string()));
    sorted
        .iter()
        .map(|(table, gates)| table_card(table, gates, now))
        .collect::<Vec<_>>()
        .join("\n\n")
}

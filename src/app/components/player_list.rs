//! Global roster with selection markers.

use pingpong_wire::Player;

use super::layout::heading;
use crate::app::QueryState;
use crate::store::{Selection, MAX_SELECTION};

pub fn player_list(players: &QueryState<Vec<Player>>, selection: &Selection) -> String {
    let note = format!("{}/{} selected", selection.len(), MAX_SELECTION);
    let players = match players {
        QueryState::Loading => return format!("{}\nLoading players…", heading("Players", Some(&note))),
        QueryState::Failed(message) => {
            return format!("{}\n! {}", heading("Players", Some(&note)), message)
        }
        QueryState::Ready(players) => players,
    };

    let mut lines = vec![heading("Players", Some(&note))];
    if players.is_empty() {
        lines.push("No players in the roster yet.".to_string());
    }
    for player in players {
        let marker = if selection.contains(&player.id) { "[x]" } else { "[ ]" };
        let playing = match player.is_playing {
            Some(true) => "  · playing",
            _ => "",
        };
        lines.push(format!("{} {:>4}  {}{}", marker, player.id, player.full_name, playing));
    }
    lines.push("Tip: select two players, then pick a free table.".to_string());
    lines.join("\n")
}

//! Players queued for the next table assignment.

use pingpong_wire::{Id, Player};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bus::{HubEvent, SharedBus};

/// A table seats exactly two players.
pub const MAX_SELECTION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Already holding two players; nothing changed
    Full,
}

/// Ordered set of at most [`MAX_SELECTION`] players.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    players: Vec<Player>,
}

impl Selection {
    pub fn toggle(&mut self, player: &Player) -> Toggle {
        if let Some(index) = self.players.iter().position(|p| p.id == player.id) {
            self.players.remove(index);
            return Toggle::Removed;
        }
        if self.players.len() >= MAX_SELECTION {
            return Toggle::Full;
        }
        self.players.push(player.clone());
        Toggle::Added
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Both player ids, in selection order, once the selection is complete.
    pub fn pair(&self) -> Option<[Id; 2]> {
        match self.players.as_slice() {
            [a, b] => Some([a.id.clone(), b.id.clone()]),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SelectionStore {
    selection: Arc<RwLock<Selection>>,
    bus: SharedBus,
}

impl SelectionStore {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            selection: Arc::new(RwLock::new(Selection::default())),
            bus,
        }
    }

    pub async fn toggle(&self, player: &Player) -> Toggle {
        let (outcome, count) = {
            let mut selection = self.selection.write().await;
            let outcome = selection.toggle(player);
            (outcome, selection.len())
        };
        if outcome != Toggle::Full {
            self.bus.publish(HubEvent::SelectionChanged { count });
        }
        outcome
    }

    pub async fn clear(&self) {
        let was_empty = {
            let mut selection = self.selection.write().await;
            let was_empty = selection.is_empty();
            selection.clear();
            was_empty
        };
        if !was_empty {
            self.bus.publish(HubEvent::SelectionChanged { count: 0 });
        }
    }

    pub async fn snapshot(&self) -> Selection {
        self.selection.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.selection.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.selection.read().await.is_empty()
    }
}

//! Table assignment lifecycle.
//!
//! ```text
//! free -> occupied(pending) -> occupied(notified) -> occupied(timer running) -> free
//! ```
//!
//! Notification is independent of the timer, and the timer can be started once
//! per assignment. The gates below decide which transitions the operator may
//! trigger; [`AssignmentFlow`] refuses anything a gate rejects before a request
//! is made.

use pingpong_wire::{AssignmentStatus, Table};
use tracing::info;

use crate::error::{HubError, Result};
use crate::state::AppState;
use crate::store::MAX_SELECTION;

/// Where a table is in its assignment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Free,
    /// Players seated, not yet notified, no timer
    Pending,
    Notified,
    TimerRunning,
    /// Still occupied but the assignment is no longer active
    Finished,
}

impl TablePhase {
    pub fn of(table: &Table) -> Self {
        if table.is_free() {
            return Self::Free;
        }
        match &table.assignment_status {
            Some(AssignmentStatus::Active) | None => {
                if table.started_at.is_some() {
                    Self::TimerRunning
                } else if table.notified_at.is_some() {
                    Self::Notified
                } else {
                    Self::Pending
                }
            }
            Some(_) => Self::Finished,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pending => "assigned",
            Self::Notified => "notified",
            Self::TimerRunning => "in play",
            Self::Finished => "finished",
        }
    }
}

pub fn can_assign(table: &Table, selected: usize, has_active_event: bool) -> bool {
    has_active_event && selected == MAX_SELECTION && table.is_free()
}

pub fn can_free(table: &Table, has_active_event: bool) -> bool {
    has_active_event && !table.is_free()
}

/// Repeats are allowed; whether a second notification is sent is up to the service.
pub fn can_notify(table: &Table, has_active_event: bool) -> bool {
    has_active_event && table.has_active_assignment()
}

/// Only once per assignment: disabled as soon as `started_at` is recorded.
pub fn can_start_timer(table: &Table, has_active_event: bool) -> bool {
    has_active_event && !table.is_free() && table.started_at.is_none()
}

pub fn can_delete(table: &Table, has_active_event: bool) -> bool {
    has_active_event && table.is_free()
}

/// Move the active assignment of `from` onto the free table `to`.
pub fn can_move(from: &Table, to: &Table, has_active_event: bool) -> bool {
    has_active_event
        && from.id != to.id
        && from.has_active_assignment()
        && from.current_assignment_id.is_some()
        && to.is_free()
}

pub fn can_swap(a: &Table, b: &Table, has_active_event: bool) -> bool {
    has_active_event && a.id != b.id && !a.is_free() && !b.is_free()
}

/// All single-table gates for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gates {
    pub assign: bool,
    pub free: bool,
    pub notify: bool,
    pub start_timer: bool,
    pub delete: bool,
}

impl Gates {
    pub fn evaluate(table: &Table, selected: usize, has_active_event: bool) -> Self {
        Self {
            assign: can_assign(table, selected, has_active_event),
            free: can_free(table, has_active_event),
            notify: can_notify(table, has_active_event),
            start_timer: can_start_timer(table, has_active_event),
            delete: can_delete(table, has_active_event),
        }
    }
}

/// Gate-checked table actions against the active event.
pub struct AssignmentFlow<'a> {
    state: &'a AppState,
}

impl<'a> AssignmentFlow<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn has_active_event(&self) -> Result<bool> {
        match self.state.active_event.id().await {
            Some(_) => Ok(true),
            None => Err(HubError::NoActiveEvent),
        }
    }

    /// Seat the two selected players at `table`. Clears the selection on success.
    pub async fn assign(&self, table: &Table, notify: bool) -> Result<()> {
        let has_event = self.has_active_event().await?;
        let selection = self.state.selection.snapshot().await;
        if !can_assign(table, selection.len(), has_event) {
            return Err(HubError::NotAllowed(if table.is_free() {
                "Select two players before assigning.".to_string()
            } else {
                format!("{} is not free.", table.display_name())
            }));
        }
        let Some(pair) = selection.pair() else {
            return Err(HubError::NotAllowed(
                "Select two players before assigning.".to_string(),
            ));
        };

        self.state.tables().assign(&table.id, pair, notify).await?;
        self.state.selection.clear().await;
        info!(table = %table.display_name(), notify, "players assigned");
        Ok(())
    }

    pub async fn free(&self, table: &Table) -> Result<()> {
        let has_event = self.has_active_event().await?;
        if !can_free(table, has_event) {
            return Err(HubError::NotAllowed(format!(
                "{} is already free.",
                table.display_name()
            )));
        }
        self.state.tables().free(&table.id).await?;
        info!(table = %table.display_name(), "table freed");
        Ok(())
    }

    pub async fn notify(&self, table: &Table) -> Result<()> {
        let has_event = self.has_active_event().await?;
        if !can_notify(table, has_event) {
            return Err(HubError::NotAllowed(format!(
                "{} has no active assignment.",
                table.display_name()
            )));
        }
        self.state.tables().notify(&table.id).await?;
        info!(table = %table.display_name(), "players notified");
        Ok(())
    }

    pub async fn start_timer(&self, table: &Table) -> Result<()> {
        let has_event = self.has_active_event().await?;
        if !can_start_timer(table, has_event) {
            return Err(HubError::NotAllowed(if table.is_free() {
                format!("{} is free.", table.display_name())
            } else {
                "The timer has already been started.".to_string()
            }));
        }
        self.state.tables().start_timer(&table.id).await?;
        info!(table = %table.display_name(), "match timer started");
        Ok(())
    }

    pub async fn move_to(&self, from: &Table, to: &Table) -> Result<()> {
        let has_event = self.has_active_event().await?;
        let assignment_id = match (&from.current_assignment_id, can_move(from, to, has_event)) {
            (Some(id), true) => id.clone(),
            _ => {
                return Err(HubError::NotAllowed(format!(
                    "Cannot move {} to {}; the target must be free.",
                    from.display_name(),
                    to.display_name()
                )))
            }
        };
        self.state
            .tables()
            .move_assignment(&assignment_id, &to.id)
            .await?;
        info!(from = %from.display_name(), to = %to.display_name(), "assignment moved");
        Ok(())
    }

    pub async fn swap(&self, a: &Table, b: &Table) -> Result<()> {
        let has_event = self.has_active_event().await?;
        if !can_swap(a, b, has_event) {
            return Err(HubError::NotAllowed(
                "Both tables must be occupied to swap.".to_string(),
            ));
        }
        self.state.tables().swap(&a.id, &b.id).await?;
        info!(a = %a.display_name(), b = %b.display_name(), "tables swapped");
        Ok(())
    }
}

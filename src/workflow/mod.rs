//! Assignment state machine and match clock.

pub mod assignment;
pub mod clock;

pub use assignment::{
    can_assign, can_delete, can_free, can_move, can_notify, can_start_timer, can_swap,
    AssignmentFlow, Gates, TablePhase,
};
pub use clock::{format_elapsed, MatchClock};

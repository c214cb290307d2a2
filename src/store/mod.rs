//! Client-side state that outlives a single request.
//!
//! Three independent stores, each a cheap-to-clone handle over shared state:
//! - [`AuthStore`] - signed-in agent and bearer token
//! - [`ActiveEventStore`] - the event being operated on
//! - [`SelectionStore`] - up to two players queued for assignment

pub mod active_event;
pub mod auth;
pub mod selection;
pub mod session;

pub use active_event::ActiveEventStore;
pub use auth::{AuthState, AuthStore};
pub use selection::{Selection, SelectionStore, Toggle, MAX_SELECTION};
pub use session::SavedSession;

//! Wire types for the PingPong event service.
//!
//! This crate defines the records that cross the REST boundary between the
//! operator dashboard and the event service:
//! - [`id`] - identifiers that may arrive as numbers or strings
//! - [`event`] - events and table seeding requests
//! - [`roster`] - agents, players (with the normalizing read path) and registrations
//! - [`table`] - table board rows and the assignment lifecycle
//! - [`import`] - bulk player import results
//! - [`time`] - lenient timestamp handling

pub mod event;
pub mod id;
pub mod import;
pub mod roster;
pub mod table;
pub mod time;

// Re-export commonly used types at crate root
pub use event::{Event, EventDraft, SeedRequest};
pub use id::Id;
pub use import::BulkImportResult;
pub use roster::{
    Agent, AgentLoginResponse, LoginRequest, Player, PlayerDraft, Registration,
    RegistrationRequest, SignupRequest,
};
pub use table::{
    AssignRequest, AssignmentStatus, MoveAssignmentRequest, PlayerSlim, SwapTablesRequest, Table,
    TableStatus,
};

//! Client error taxonomy.

use pingpong_wire::Id;

/// Everything a dashboard operation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Rejected client-side before any request was made.
    #[error("{0}")]
    Validation(String),

    /// A gate refused the action (e.g. freeing a table that is already free).
    #[error("{0}")]
    NotAllowed(String),

    /// Event-scoped operation without an active event.
    #[error("No active event selected")]
    NoActiveEvent,

    /// Non-2xx response; `message` is the response body or `HTTP <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// HTTP 401. The session has already been logged out when this is returned.
    #[error("{0}")]
    Unauthorized(String),

    /// A batch stopped partway; the first `committed` items were not rolled back.
    #[error("{message}")]
    PartialBatch {
        committed: usize,
        total: usize,
        failed: Id,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HubError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// HTTP status of a server-side failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type Result<T, E = HubError> = std::result::Result<T, E>;

//! Presentational components rendered as terminal text.

pub mod event_list;
pub mod event_players;
pub mod feedback;
pub mod layout;
pub mod player_list;
pub mod table_card;

pub use event_list::event_list;
pub use event_players::event_players;
pub use feedback::{feedback_banner, import_summary};
pub use layout::layout;
pub use player_list::player_list;
pub use table_card::{table_board, table_card};

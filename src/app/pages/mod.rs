//! Page composition.

pub mod dashboard;
pub mod login;

pub use dashboard::{Dashboard, Summary};

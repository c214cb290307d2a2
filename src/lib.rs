//! PingPong Hub
//!
//! Operator dashboard for running table-tennis events against the PingPong
//! REST service.
//!
//! This library provides:
//! - An authenticated HTTP client for the service
//! - A query cache with staleness windows, invalidation and background polling
//! - Auth, active-event and player-selection stores
//! - The table assignment state machine and match clock
//! - The operations console (events, tables, players, registrations, imports)
//! - Terminal pages and components

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod admin;
pub mod api;
pub mod app;
pub mod bus;
pub mod cache;
pub mod config;
pub mod error;
pub mod resources;
pub mod state;
pub mod store;
pub mod workflow;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{HubError, Result};
pub use state::AppState;

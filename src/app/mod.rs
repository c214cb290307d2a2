//! Terminal front-end.
//!
//! Components are pure functions from data to text; pages gather data from
//! the resource accessors and stores and compose components into a screen.
//! Routing is a single choice driven by the auth store: the login page while
//! signed out, the dashboard otherwise.

pub mod components;
pub mod pages;

use crate::error::Result;
use crate::store::AuthStore;

/// Load state of one query as seen by a component.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub async fn current(auth: &AuthStore) -> Self {
        if auth.is_authenticated().await {
            Self::Dashboard
        } else {
            Self::Login
        }
    }
}

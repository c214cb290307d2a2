//! Agent authentication endpoints.

use pingpong_wire::{Agent, AgentLoginResponse, LoginRequest, SignupRequest};

use super::ApiClient;
use crate::error::{HubError, Result};

impl ApiClient {
    /// `POST /auth/login`. Does not touch the auth store.
    pub async fn login(&self, email: &str, password: &str) -> Result<AgentLoginResponse> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login", &body).await?.into_json()
    }

    /// `POST /agents`.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Agent> {
        if request.full_name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(HubError::Validation(
                "Name, email and password are required.".to_string(),
            ));
        }
        self.post("/agents", request).await?.into_json()
    }
}

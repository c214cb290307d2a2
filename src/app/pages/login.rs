//! Sign-in and agent signup.

use pingpong_wire::{Agent, SignupRequest};

use crate::admin::Feedback;
use crate::app::components::layout::{heading, layout};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Sign in and store the session. Errors are operator-facing text.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<Agent, String> {
    match state.api.login(email, password).await {
        Ok(response) => {
            let agent = response.agent.clone();
            state.auth.login(response).await;
            Ok(agent)
        }
        Err(e) => {
            let message = e.to_string();
            Err(if message.trim().is_empty() {
                INVALID_CREDENTIALS.to_string()
            } else {
                message
            })
        }
    }
}

pub async fn signup(state: &AppState, request: &SignupRequest) -> Feedback {
    match state.api.signup(request).await {
        Ok(agent) => Feedback::success(format!(
            "Agent {} created. Sign in with {}.",
            agent.full_name, agent.email
        )),
        Err(e) => Feedback::from_error(&e),
    }
}

pub fn render(error: Option<&str>) -> String {
    let mut body = vec![
        heading("Agent access", None),
        "Sign in to PingPong Hub to manage events, tables, and players.".to_string(),
        "  pingpong-hub login --email <EMAIL> --password <PASSWORD>".to_string(),
    ];
    match error {
        Some(error) => body.push(format!("! {}", error)),
        None => body.push(
            "Need access? Create an agent with `pingpong-hub signup` or ask an administrator."
                .to_string(),
        ),
    }
    layout("Sign in", None, &[body.join("\n")])
}

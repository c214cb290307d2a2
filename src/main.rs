//! PingPong Hub - terminal dashboard for table-tennis event operators.

use anyhow::Result;
use clap::Parser;
use pingpong_hub::cli::{self, Cli};
use pingpong_hub::config;
use pingpong_hub::store::SavedSession;
use pingpong_hub::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let command = Cli::parse().command();

    // Load configuration first; it carries the default log filter
    let config = config::load_config()?;

    // Logs go to stderr so rendered pages on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    let session_path = config.session_path();
    let state = AppState::new(config)?;
    state.restore_session(SavedSession::load(&session_path)).await;

    let result = cli::run(&state, command).await;

    // Persist whatever the command left behind; a forced logout drops the token
    state.persist_session(&session_path).await?;

    let output = result?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

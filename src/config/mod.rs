//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Service origin; requests go to `{api_url}/api/...`
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout. Unset means requests wait for the service.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default = "default_clock_tick_millis")]
    pub clock_tick_millis: u64,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Overrides the session file location
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_clock_tick_millis() -> u64 {
    1000
}

fn default_log_filter() -> String {
    "pingpong_hub=info".to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: None,
            cache: CacheConfig::default(),
            clock_tick_millis: default_clock_tick_millis(),
            log_filter: default_log_filter(),
            session_file: None,
        }
    }
}

impl HubConfig {
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| get_config_dir().join(SESSION_FILE))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "default_events_stale_secs")]
    pub events_stale_secs: u64,

    #[serde(default = "default_registrations_stale_secs")]
    pub registrations_stale_secs: u64,

    /// Refresh interval of the player list and the table board
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_events_stale_secs() -> u64 {
    30
}

fn default_registrations_stale_secs() -> u64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            events_stale_secs: default_events_stale_secs(),
            registrations_stale_secs: default_registrations_stale_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "pingpong-hub", "pingpong-hub")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config() -> Result<HubConfig> {
    let config_dir = get_config_dir();

    let config = ::config::Config::builder()
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (PPH_API_URL, PPH_CACHE__POLL_INTERVAL_SECS, etc.)
        .add_source(
            ::config::Environment::with_prefix("PPH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API key
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Base URL of the YouTube Data API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Videos with more views than this are dropped
    #[serde(default = "default_max_view_count")]
    pub max_view_count: u64,

    /// Timeout applied to each HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory CSV reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write debug logs to a file
    #[serde(default)]
    pub debug: bool,

    /// Log file or directory (default: next to config.toml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// Number of rotated log files to keep (0 keeps all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_base: default_api_base(),
            max_view_count: default_max_view_count(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

impl Config {
    /// Apply `YOUTUBE_API_KEY` if it is set and non-empty
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(super::API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("using api key from environment");
                self.api_key = key.trim().to_string();
            }
        }
    }
}

/// How the debug log file is rotated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// Single file, appended to
    None,
    /// One file per day
    Daily,
    /// One file per run
    Session,
}

fn default_api_key() -> String {
    "YOUR_API_KEY_HERE".to_string()
}

fn default_api_base() -> String {
    crate::search::providers::YouTubeClient::DEFAULT_API_BASE.to_string()
}

fn default_max_view_count() -> u64 {
    crate::aggregate::DEFAULT_MAX_VIEW_COUNT
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

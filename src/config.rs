//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the activity authority API (e.g. `https://api.example.com/api`)
    pub authority_url: String,
    /// Bearer token attached to every authority call. Session handling is
    /// an external collaborator's concern; we only forward the token.
    pub authority_token: String,
    /// Path of the local activity store file
    pub store_path: String,
    /// Caller identity the local records belong to
    pub user_id: String,
    /// Whether the caller holds the elevated capability (sees all records)
    pub elevated: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            authority_url: "http://localhost:5000/api".to_string(),
            authority_token: "test_token".to_string(),
            store_path: "pulse_store.json".to_string(),
            user_id: "test_user".to_string(),
            elevated: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            authority_url: env::var("AUTHORITY_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            authority_token: env::var("AUTHORITY_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("AUTHORITY_TOKEN"))?,
            store_path: env::var("STORE_PATH")
                .unwrap_or_else(|_| "pulse_store.json".to_string()),
            user_id: env::var("SYNC_USER_ID").map_err(|_| ConfigError::Missing("SYNC_USER_ID"))?,
            elevated: env::var("SYNC_ELEVATED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Storage URLs are optional: without `DATABASE_URL` / `REDIS_URL` the
//! service runs against in-memory backends (local development).

use std::env;
use std::time::Duration;

use chrono_tz::Tz;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Fantasy API / OAuth ---
    /// OAuth client ID
    pub yahoo_client_id: String,
    /// OAuth client secret
    pub yahoo_client_secret: String,
    /// Redirect URI registered with the OAuth app
    pub yahoo_redirect_uri: String,
    /// Fantasy API base (`.../fantasy/v2`)
    pub yahoo_api_base: String,
    /// OAuth base (`request_auth` and `get_token` live under it)
    pub yahoo_auth_base: String,
    /// Fantasy game key used when listing the whole player universe
    pub nhl_game_key: String,

    // --- Stats API ---
    pub nhl_api_base: String,

    // --- Storage ---
    /// Postgres URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Redis URL; `None` selects the in-memory cache
    pub redis_url: Option<String>,

    // --- Server ---
    /// Frontend URL for OAuth redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Timing ---
    /// Per-call timeout applied to every upstream request
    pub http_timeout: Duration,
    /// Fixed delay between paginated upstream calls
    pub pagination_delay: Duration,
    /// Zone whose local end-of-day bounds cache TTLs
    pub cache_time_zone: Tz,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            yahoo_client_id: env::var("YAHOO_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("YAHOO_CLIENT_ID"))?,
            yahoo_client_secret: env::var("YAHOO_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("YAHOO_CLIENT_SECRET"))?,
            yahoo_redirect_uri: env::var("YAHOO_REDIRECT_URI").unwrap_or_else(|_| "oob".to_string()),
            yahoo_api_base: env::var("YAHOO_API_BASE").unwrap_or_else(|_| {
                "https://fantasysports.yahooapis.com/fantasy/v2".to_string()
            }),
            yahoo_auth_base: env::var("YAHOO_AUTH_BASE")
                .unwrap_or_else(|_| "https://api.login.yahoo.com/oauth2".to_string()),
            nhl_game_key: env::var("NHL_GAME_KEY").unwrap_or_else(|_| "453".to_string()),
            nhl_api_base: env::var("NHL_API_BASE")
                .unwrap_or_else(|_| "https://api-web.nhle.com/v1".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 30)?),
            pagination_delay: Duration::from_millis(parse_or("PAGINATION_DELAY_MS", 500)?),
            cache_time_zone: env::var("CACHE_TIME_ZONE")
                .unwrap_or_else(|_| "America/New_York".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("CACHE_TIME_ZONE"))?,
        })
    }

    /// Config pointing every upstream at `base_url` (a stub server in tests).
    pub fn test_default(base_url: &str) -> Self {
        Self {
            yahoo_client_id: "test_client_id".to_string(),
            yahoo_client_secret: "test_secret".to_string(),
            yahoo_redirect_uri: "oob".to_string(),
            yahoo_api_base: format!("{}/fantasy/v2", base_url),
            yahoo_auth_base: format!("{}/oauth2", base_url),
            nhl_game_key: "453".to_string(),
            nhl_api_base: format!("{}/v1", base_url),
            database_url: None,
            redis_url: None,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            http_timeout: Duration::from_secs(5),
            pagination_delay: Duration::from_millis(0),
            cache_time_zone: chrono_tz::America::New_York,
        }
    }
}

fn parse_or(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Consecutive like/unlike failures on one post before its state is re-fetched.
    pub like_reconcile_after: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let api_base_url = env::var("FEED_API_URL")
            .map_err(|_| AppError::Config("FEED_API_URL must be set".to_string()))?;

        let api_token = env::var("FEED_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let request_timeout_secs = parse_or("FEED_REQUEST_TIMEOUT_SECS", 15)?;
        let like_reconcile_after = parse_or("FEED_LIKE_RECONCILE_AFTER", 3)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout_secs,
            like_reconcile_after,
            rust_log,
        })
    }

    /// Configuration for a given server with every other knob at its default.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            request_timeout_secs: 15,
            like_reconcile_after: 3,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

use std::{env, path::PathBuf, time::Duration};

use crate::{errors::Error, tag::Tag, Result};

/// Base URL of the official Clash Royale API.
pub const ROYALE_API_BASE_URL: &str = "https://api.clashroyale.com/v1";

/// Typed configuration, loaded once at startup and immutable afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub telegram_message_limit: usize,

    // Statistics API
    /// Bearer token; empty is allowed (requests go out unauthenticated).
    pub royale_api_token: String,
    pub royale_api_base_url: String,
    pub api_timeout: Duration,

    // Fallback player source
    pub fallback_api_base_url: Option<String>,
    pub fallback_api_token: Option<String>,

    // Clan commands
    pub clan_tag: Option<Tag>,

    // Storage
    pub user_store_path: PathBuf,
}

impl Config {
    /// Load from the process environment, after applying `.env` if present.
    pub fn load() -> Result<Self> {
        // Existing env vars win over `.env`.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("BOT_TOKEN").ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;
        let telegram_message_limit = get("TELEGRAM_MESSAGE_LIMIT")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(4096);

        let royale_api_token = get("CR_API_TOKEN").unwrap_or_default();
        let royale_api_base_url = get("CR_API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| ROYALE_API_BASE_URL.to_string());
        let api_timeout = Duration::from_millis(
            get("API_TIMEOUT_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(10_000),
        );

        let fallback_api_base_url =
            get("FALLBACK_API_BASE_URL").map(|s| s.trim().trim_end_matches('/').to_string());
        let fallback_api_token = get("FALLBACK_API_TOKEN");

        let clan_tag = get("CLAN_TAG").map(|s| Tag::new(&s)).filter(|t| !t.is_empty());

        let user_store_path = PathBuf::from(
            get("USER_STORE_PATH").unwrap_or_else(|| "data/users.json".to_string()),
        );

        Ok(Self {
            telegram_bot_token,
            telegram_message_limit,
            royale_api_token,
            royale_api_base_url,
            api_timeout,
            fallback_api_base_url,
            fallback_api_token,
            clan_tag,
            user_store_path,
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

use std::time::Duration;

use anyhow::{Context, Result};
use leaderboard::{ServiceOptions, repository::redis_store::DEFAULT_LEADERBOARD_KEY};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub leaderboard_key: String,
    pub store_timeout: Option<Duration>,
    pub max_update_attempts: u32,
    pub default_window: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            leaderboard_key: std::env::var("LEADERBOARD_KEY")
                .unwrap_or_else(|_| DEFAULT_LEADERBOARD_KEY.to_string()),
            store_timeout: optional_number("STORE_TIMEOUT_MS")?.map(Duration::from_millis),
            max_update_attempts: optional_number("MAX_UPDATE_ATTEMPTS")?.unwrap_or(5),
            default_window: optional_number("DEFAULT_WINDOW")?.unwrap_or(10),
        })
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            max_update_attempts: self.max_update_attempts,
            call_timeout: self.store_timeout,
            default_window: self.default_window,
        }
    }
}

fn optional_number<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(None),
    }
}

use secrecy::SecretString;
use std::{env, time::Duration};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<SecretString>,
    pub http_timeout_secs: u64,
    pub practice_poll_interval_ms: u64,
    pub practice_poll_timeout_secs: u64,
    pub timer_tick_millis: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string()),
            api_token: env::var("API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            practice_poll_interval_ms: env::var("PRACTICE_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
            practice_poll_timeout_secs: env::var("PRACTICE_POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            timer_tick_millis: env::var("TIMER_TICK_MILLIS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Rejects settings the client cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::ValidationError(format!(
                "API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.timer_tick_millis == 0 {
            return Err(AppError::ValidationError(
                "TIMER_TICK_MILLIS must be greater than zero".to_string(),
            ));
        }
        if self.practice_poll_interval_ms == 0 {
            return Err(AppError::ValidationError(
                "PRACTICE_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_millis)
    }

    pub fn practice_poll_interval(&self) -> Duration {
        Duration::from_millis(self.practice_poll_interval_ms)
    }

    pub fn practice_poll_timeout(&self) -> Duration {
        Duration::from_secs(self.practice_poll_timeout_secs)
    }

    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            api_token: Some(SecretString::from("test_token".to_string())),
            http_timeout_secs: 5,
            practice_poll_interval_ms: 10,
            practice_poll_timeout_secs: 1,
            timer_tick_millis: 1000,
        }
    }
}

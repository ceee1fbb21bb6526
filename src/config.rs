use std::time::Duration;

use config::{Config as ConfigLib, ConfigError, Environment, ValueKind};
use secrecy::SecretString;
use serde::Deserialize;

use crate::errors::StartupError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_TIME: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub practicum: PracticumConfig,
    pub telegram: TelegramConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PracticumConfig {
    #[serde(default)]
    pub token: Option<SecretString>,
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default)]
    pub chat_id: Option<String>,
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds to sleep between two cycles
    pub retry_time: u64,
    /// Initial value of the `from_date` cursor
    pub from_date: i64,
    /// Move the cursor to the `current_date` of every valid response
    pub advance_cursor: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file appended to; an empty value logs to stdout
    #[serde(default)]
    pub file: Option<String>,
}

/// The three secrets the bot cannot run without
#[derive(Debug, Clone)]
pub struct Credentials {
    pub practicum_token: SecretString,
    pub telegram_token: SecretString,
    pub chat_id: String,
}

impl PollingConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_time)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLib::builder()
            // Set default values
            .set_default("practicum.endpoint", DEFAULT_ENDPOINT)?
            .set_default("telegram.api_url", DEFAULT_TELEGRAM_API_URL)?
            .set_default("polling.retry_time", DEFAULT_RETRY_TIME)?
            .set_default("polling.from_date", 0)?
            .set_default("polling.advance_cursor", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.file", "homework.log")?
            // Override tunables via environment variables
            // The environment variables should be prefixed with 'APP_' and use '__' as a separator
            // Example: APP_POLLING__RETRY_TIME=60
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Secrets are read from their well-known variable names only,
            // an unset one overrides any `APP_` spelling with nil
            .set_override("practicum.token", secret_var(PRACTICUM_TOKEN))?
            .set_override("telegram.token", secret_var(TELEGRAM_TOKEN))?
            .set_override("telegram.chat_id", secret_var(TELEGRAM_CHAT_ID))?
            .build()?;

        config.try_deserialize()
    }

    /// Checks that every required secret is present.
    ///
    /// # Errors
    /// Returns [`StartupError::MissingCredentials`] naming each absent variable.
    pub fn credentials(&self) -> Result<Credentials, StartupError> {
        let mut missing = Vec::new();
        if self.practicum.token.is_none() {
            missing.push(PRACTICUM_TOKEN);
        }
        if self.telegram.token.is_none() {
            missing.push(TELEGRAM_TOKEN);
        }
        if self.telegram.chat_id.is_none() {
            missing.push(TELEGRAM_CHAT_ID);
        }

        match (
            &self.practicum.token,
            &self.telegram.token,
            &self.telegram.chat_id,
        ) {
            (Some(practicum_token), Some(telegram_token), Some(chat_id)) => Ok(Credentials {
                practicum_token: practicum_token.clone(),
                telegram_token: telegram_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => Err(StartupError::MissingCredentials(missing)),
        }
    }

    /// Log file path, `None` when logging goes to stdout
    pub fn log_file(&self) -> Option<&str> {
        self.logging
            .file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

// Blank values count as missing
fn secret_var(name: &str) -> ValueKind {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => ValueKind::String(value.trim().to_string()),
        _ => ValueKind::Nil,
    }
}

use std::time::Duration;

use crate::server::error::{config::ConfigError, AppError};

/// Default cadence of the now-playing progress ticker.
const DEFAULT_TICK_SECONDS: u64 = 5;
/// Fastest cadence allowed; Discord throttles repeated edits of one message.
const MIN_TICK_SECONDS: u64 = 2;
/// Number of most recent channel messages the display must be among to be edited in place.
const DEFAULT_RECENT_WINDOW: u8 = 3;
/// Runs the inactive-session sweep at the start of every minute.
const DEFAULT_SWEEP_CRON: &str = "0 * * * * *";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,
    pub display: DisplayConfig,
    pub sweep_cron: String,
}

/// Tuning knobs of the now-playing display controller.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Interval between progress refreshes of a live display.
    pub tick_interval: Duration,
    /// How many of the channel's newest messages count as "still visible".
    pub recent_window: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECONDS),
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Arguments
    /// - `lookup` - Returns the value of an environment variable, if set
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and optional ones valid
    /// - `Err(AppError::ConfigErr)` - A required variable is missing or a value is invalid
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let tick_seconds = match lookup("NOW_PLAYING_TICK_SECONDS") {
            Some(value) => parse_tick_seconds(&value)?,
            None => DEFAULT_TICK_SECONDS,
        };

        let recent_window = match lookup("NOW_PLAYING_RECENT_WINDOW") {
            Some(value) => parse_recent_window(&value)?,
            None => DEFAULT_RECENT_WINDOW,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            display: DisplayConfig {
                tick_interval: Duration::from_secs(tick_seconds),
                recent_window,
            },
            sweep_cron: lookup("NOW_PLAYING_SWEEP_CRON")
                .unwrap_or_else(|| DEFAULT_SWEEP_CRON.to_string()),
        })
    }
}

fn parse_tick_seconds(value: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEnvVar {
        name: "NOW_PLAYING_TICK_SECONDS".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let seconds = value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid("expected a whole number of seconds"))?;

    if seconds < MIN_TICK_SECONDS {
        return Err(invalid("must be at least 2 seconds"));
    }

    Ok(seconds)
}

fn parse_recent_window(value: &str) -> Result<u8, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEnvVar {
        name: "NOW_PLAYING_RECENT_WINDOW".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match value.trim().parse::<u8>() {
        Ok(window) if (1..=100).contains(&window) => Ok(window),
        _ => Err(invalid("expected a number between 1 and 100")),
    }
}

//! Startup configuration read from the process environment (and an optional
//! `.env` file loaded by the binary before [`Config::from_env`] is called).

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use humantime_serde::re::humantime;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PREFIX: &str = "~";
pub const DEFAULT_SOUNDS_FOLDER: &str = "sounds";
pub const DEFAULT_COMMANDS_FILE: &str = "commands.json";
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PLAYBACK_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Errors that make the process unable to start
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("Failed to read commands file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed commands file: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Invalid command entry for sound '{file_name}': {reason}")]
    InvalidEntry { file_name: String, reason: String },

    #[error("Command '{alias}' is mapped to both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub prefix: String,
    pub sounds_folder: PathBuf,
    pub commands_file: PathBuf,
    pub join_timeout: Duration,
    pub playback_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, applying defaults for
    /// everything except the token.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN").ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "DISCORD_TOKEN",
                reason: "token is empty".to_string(),
            });
        }

        let prefix = lookup("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "COMMAND_PREFIX",
                reason: "prefix is empty".to_string(),
            });
        }

        let sounds_folder = lookup("SOUNDS_FOLDER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUNDS_FOLDER));
        let commands_file = lookup("COMMANDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMMANDS_FILE));

        let join_timeout = duration_var(&lookup, "JOIN_TIMEOUT", DEFAULT_JOIN_TIMEOUT)?;
        let playback_timeout =
            duration_var(&lookup, "PLAYBACK_TIMEOUT", DEFAULT_PLAYBACK_TIMEOUT)?;
        let shutdown_grace = duration_var(&lookup, "SHUTDOWN_GRACE", DEFAULT_SHUTDOWN_GRACE)?;

        debug!(
            "Configuration loaded: prefix '{}', sounds in {:?}, commands from {:?}",
            prefix, sounds_folder, commands_file
        );

        Ok(Self {
            token,
            prefix,
            sounds_folder,
            commands_file,
            join_timeout,
            playback_timeout,
            shutdown_grace,
        })
    }
}

fn duration_var<F>(lookup: &F, var: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };

    let duration =
        humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        })?;
    if duration.is_zero() {
        return Err(ConfigError::InvalidVar {
            var,
            reason: "duration must be greater than zero".to_string(),
        });
    }
    Ok(duration)
}

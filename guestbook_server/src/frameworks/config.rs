use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::interface_adapters::state::SessionSaveFailurePolicy;
use crate::use_cases::sessions::{
    DEFAULT_NON_PERSISTENT_SESSION_SECS, DEFAULT_SESSION_MAX_AGE_SECS,
};

// Config file read when GUESTBOOK_CONFIG is not set.
pub const DEFAULT_CONFIG_PATH: &str = "guestbook.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    // Unset means greetings and sessions live in memory.
    pub database_url: Option<String>,
    // Unset means every caller is anonymous.
    pub auth_service_url: Option<String>,
    pub auth_timeout_ms: u64,
    pub session_namespace: String,
    pub session_default_duration_secs: u64,
    // Max-age of newly created sessions.
    pub session_default_max_age_secs: i64,
    pub session_demo_max_age: Option<i64>,
    pub session_save_failure: SessionSaveFailurePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            auth_service_url: None,
            auth_timeout_ms: 1500,
            session_namespace: String::new(),
            session_default_duration_secs: DEFAULT_NON_PERSISTENT_SESSION_SECS,
            session_default_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            session_demo_max_age: None,
            session_save_failure: SessionSaveFailurePolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        key: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "failed to parse config: {err}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    // File (if any) first, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("GUESTBOOK_CONFIG").ok();
        let path = explicit
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        // A missing default file is fine; a missing explicit one is not.
        let config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("GUESTBOOK_PORT") {
            self.port = parse_value("GUESTBOOK_PORT", value)?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.database_url = non_empty(value);
        }
        if let Some(value) = lookup("AUTH_SERVICE_URL") {
            self.auth_service_url = non_empty(value);
        }
        if let Some(value) = lookup("AUTH_TIMEOUT_MS") {
            self.auth_timeout_ms = parse_value("AUTH_TIMEOUT_MS", value)?;
        }
        if let Some(value) = lookup("SESSION_NAMESPACE") {
            self.session_namespace = value;
        }
        if let Some(value) = lookup("SESSION_DEFAULT_DURATION_SECS") {
            self.session_default_duration_secs =
                parse_value("SESSION_DEFAULT_DURATION_SECS", value)?;
        }
        if let Some(value) = lookup("SESSION_DEFAULT_MAX_AGE_SECS") {
            self.session_default_max_age_secs =
                parse_value("SESSION_DEFAULT_MAX_AGE_SECS", value)?;
        }
        if let Some(value) = lookup("SESSION_DEMO_MAX_AGE") {
            self.session_demo_max_age = match non_empty(value) {
                Some(value) => Some(parse_value("SESSION_DEMO_MAX_AGE", value)?),
                None => None,
            };
        }
        if let Some(value) = lookup("SESSION_SAVE_FAILURE") {
            self.session_save_failure = parse_value("SESSION_SAVE_FAILURE", value)?;
        }

        Ok(self)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

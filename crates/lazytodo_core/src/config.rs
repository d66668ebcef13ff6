//! Environment-driven configuration.
//!
//! # Responsibility
//! - Resolve which store backend to use and where it keeps its data.
//! - Resolve logging level and directory.
//!
//! # Invariants
//! - Resolution is a pure function of the lookup; `from_env` only plugs in
//!   `std::env::var`.
//! - Unset variables fall back to documented defaults; malformed values are
//!   rejected rather than silently replaced.

use crate::db::DbLocation;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const BACKEND_VAR: &str = "LAZYTODO_BACKEND";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const SESSION_FILE_VAR: &str = "LAZYTODO_SESSION_FILE";
pub const LOG_LEVEL_VAR: &str = "LAZYTODO_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "LAZYTODO_LOG_DIR";

const DEFAULT_DATABASE: &str = "todos.db";
const DEFAULT_SESSION_FILE: &str = "lazytodo-session.json";

/// Store backend selected at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Ephemeral session store, persisted by the caller as JSON at `path`.
    Session { path: PathBuf },
    /// Relational store in SQLite.
    Sqlite { location: DbLocation },
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub log_level: String,
    /// File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => write!(
                f,
                "unsupported {BACKEND_VAR} `{value}`; expected session|sqlite"
            ),
            Self::EmptyValue(key) => write!(f, "{key} is set but empty"),
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_name = lookup(BACKEND_VAR).unwrap_or_else(|| "sqlite".to_string());
        let backend = match backend_name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "database" => {
                let descriptor =
                    lookup(DATABASE_URL_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
                let location = DbLocation::parse(&descriptor)
                    .ok_or(ConfigError::EmptyValue(DATABASE_URL_VAR))?;
                Backend::Sqlite { location }
            }
            "session" | "memory" => {
                let path =
                    lookup(SESSION_FILE_VAR).unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
                if path.trim().is_empty() {
                    return Err(ConfigError::EmptyValue(SESSION_FILE_VAR));
                }
                Backend::Session {
                    path: PathBuf::from(path.trim()),
                }
            }
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let log_level = lookup(LOG_LEVEL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = lookup(LOG_DIR_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            backend,
            log_level,
            log_dir,
        })
    }
}

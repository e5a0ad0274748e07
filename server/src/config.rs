//! Server configuration, read once from the environment.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Without a database every endpoint answers with an empty success
    pub database_path: Option<PathBuf>,
    /// Built UI to serve next to the API
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_path: None,
            static_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            port: try_load("BLOBBY_PORT", defaults.port),
            database_path: optional_path("BLOBBY_DATABASE_PATH"),
            static_dir: optional_path("BLOBBY_STATIC_DIR"),
        }
    }

    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Some(PathBuf::from(raw)),
        _ => {
            info!("{key} not set");
            None
        }
    }
}

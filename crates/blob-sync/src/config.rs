//! Client configuration

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_TASK_SIZE;

/// Behaviour switches for the synchronizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Revert a drag when its save fails.
    pub rollback_failed_moves: bool,
    /// Diameter for blobs created without an explicit size.
    pub default_task_size: f64,
    /// Label a new blob shows until the user names it.
    pub new_task_label: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            rollback_failed_moves: false,
            default_task_size: DEFAULT_TASK_SIZE,
            new_task_label: "New Task".to_string(),
        }
    }
}

/// Where and as whom the HTTP repository talks to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:3000/api`
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"rollback_failed_moves":true}"#).unwrap();
        assert!(config.rollback_failed_moves);
        assert_eq!(config.default_task_size, DEFAULT_TASK_SIZE);
        assert_eq!(config.new_task_label, "New Task");
    }

    #[test]
    fn test_api_root_trims_slash() {
        let config = ClientConfig::new("http://example.test/api/").with_token("u1");
        assert_eq!(config.api_root(), "http://example.test/api");
        assert_eq!(config.token.as_deref(), Some("u1"));
    }
}

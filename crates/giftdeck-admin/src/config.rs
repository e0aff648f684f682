//! Configuration management for Giftdeck admin tooling
//!
//! Store connection settings live in ~/.config/giftdeck/config.toml and can be
//! overridden from the environment (a `.env` file is loaded first).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "giftdeck";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_PROJECT: &str = "GIFTDECK_FIRESTORE_PROJECT";
pub const ENV_API_KEY: &str = "GIFTDECK_FIRESTORE_API_KEY";
pub const ENV_TOKEN: &str = "GIFTDECK_FIRESTORE_TOKEN";
pub const ENV_APP_BASE_URL: &str = "GIFTDECK_APP_BASE_URL";

/// Firestore connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OAuth2 access token sent as a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Collection names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default = "default_accounts_collection")]
    pub accounts: String,
    #[serde(default = "default_ranks_collection")]
    pub ranks: String,
}

/// Admin tooling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Public portal URL used to build signup links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_base_url: Option<String>,
    #[serde(default)]
    pub firestore: FirestoreConfig,
    #[serde(default)]
    pub collections: Collections,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_accounts_collection() -> String {
    "users".to_string()
}

fn default_ranks_collection() -> String {
    "ranks".to_string()
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database: default_database(),
            base_url: default_base_url(),
            api_key: None,
            access_token: None,
        }
    }
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            accounts: default_accounts_collection(),
            ranks: default_ranks_collection(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load config from `path`, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Override settings from environment lookups; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(project) = get(ENV_PROJECT) {
            self.firestore.project_id = Some(project);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.firestore.api_key = Some(key);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.firestore.access_token = Some(token);
        }
        if let Some(url) = get(ENV_APP_BASE_URL) {
            self.app_base_url = Some(url);
        }
    }

    /// Copy with secrets replaced, for display
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.firestore.api_key = config.firestore.api_key.as_deref().map(mask);
        config.firestore.access_token = config.firestore.access_token.as_deref().map(mask);
        config
    }
}

fn mask(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_missing_file() {
        let config = Config::from_file(Path::new("/nonexistent/giftdeck.toml")).unwrap();
        assert_eq!(config.firestore.database, "(default)");
        assert_eq!(config.collections.accounts, "users");
        assert_eq!(config.collections.ranks, "ranks");
        assert!(config.firestore.project_id.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            app_base_url = "https://giftdeck.app"

            [firestore]
            project_id = "giftdeck-prod"

            [collections]
            ranks = "rewardRanks"
            "#,
        )
        .unwrap();

        assert_eq!(config.firestore.project_id.as_deref(), Some("giftdeck-prod"));
        assert_eq!(
            config.firestore.base_url,
            "https://firestore.googleapis.com/v1"
        );
        assert_eq!(config.collections.accounts, "users");
        assert_eq!(config.collections.ranks, "rewardRanks");
        assert_eq!(config.app_base_url.as_deref(), Some("https://giftdeck.app"));
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            (ENV_PROJECT, "from-env"),
            (ENV_TOKEN, "ya29.token"),
            (ENV_API_KEY, ""),
        ]);
        let mut config = Config::default();
        config.firestore.api_key = Some("file-key".to_string());

        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.firestore.project_id.as_deref(), Some("from-env"));
        assert_eq!(config.firestore.access_token.as_deref(), Some("ya29.token"));
        assert_eq!(config.firestore.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_masked_hides_secrets() {
        let mut config = Config::default();
        config.firestore.access_token = Some("ya29.secret-token".to_string());

        let masked = config.masked();
        assert_eq!(masked.firestore.access_token.as_deref(), Some("ya29****"));
    }
}

//! CLI configuration management.
//!
//! Persists the server URL, login client name and message page size to
//! `~/.gotify-admin/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gotify_admin_core::DEFAULT_CLIENT_NAME;
use gotify_admin_core::services::DEFAULT_MESSAGE_LIMIT;

const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";
const LOG_FILE: &str = "console.log";

/// Persistent CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Gotify server URL (e.g., "<https://push.example.com>").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Name of the client registered at login.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// How many messages to fetch per listing.
    #[serde(default = "default_message_limit")]
    pub message_limit: u32,
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.into()
}

const fn default_message_limit() -> u32 {
    DEFAULT_MESSAGE_LIMIT
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            client_name: default_client_name(),
            message_limit: default_message_limit(),
        }
    }
}

impl CliConfig {
    /// Path to the config directory: `~/.gotify-admin/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gotify-admin"))
    }

    /// Path to the config file: `~/.gotify-admin/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE))
    }

    /// Path to the persisted session: `~/.gotify-admin/session.json`.
    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(SESSION_FILE))
    }

    /// Path to the console log: `~/.gotify-admin/console.log`.
    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(LOG_FILE))
    }

    /// Load config from disk. Returns default if file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path =
            Self::config_path().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Server URL to use: the override when given, else the configured one.
    pub fn resolve_url(&self, override_url: Option<&str>) -> anyhow::Result<String> {
        override_url
            .or(self.server_url.as_deref())
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("No server URL configured. Use --url <url> or set GOTIFY_URL")
            })
    }
}

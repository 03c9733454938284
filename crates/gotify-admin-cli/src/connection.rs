//! Server connection setup.
//!
//! Resolves the server URL and session file, then builds the request client
//! shared by subcommands and the console.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use gotify_admin_core::{ClientConfig, FileStorage, RequestClient, SessionStore};

use crate::config::CliConfig;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Gotify server base URL.
    pub server_url: String,
    /// Name given to the client created at login.
    pub client_name: String,
    /// Where the session is persisted. `None` keeps it in memory.
    pub session_path: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Combine the stored config with a `--url` / `GOTIFY_URL` override.
    pub fn from_cli(config: &CliConfig, url_override: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            server_url: config.resolve_url(url_override)?,
            client_name: config.client_name.clone(),
            session_path: CliConfig::session_path(),
        })
    }

    /// Open the session store this connection reads its token from.
    pub fn session_store(&self) -> SessionStore {
        open_session(self.session_path.as_deref())
    }
}

/// Session store at `path`, or an in-memory one without a home directory.
///
/// Needs no server URL, so local-only commands can use it directly.
pub fn open_session(path: Option<&Path>) -> SessionStore {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Using file-backed session");
            SessionStore::new(FileStorage::new(path.to_path_buf()))
        }
        None => {
            warn!("No home directory; session will not survive this process");
            SessionStore::in_memory()
        }
    }
}

/// Build a request client over HTTP(S) for `config`.
pub fn connect(config: &ConnectionConfig) -> anyhow::Result<RequestClient> {
    let session = Arc::new(config.session_store());
    let client = RequestClient::connect(
        &ClientConfig {
            base_url: config.server_url.clone(),
            client_name: config.client_name.clone(),
        },
        session,
    )?;
    Ok(client)
}

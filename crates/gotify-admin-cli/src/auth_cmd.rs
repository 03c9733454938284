//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use tracing::{info, warn};

use gotify_admin_core::{RequestClient, SessionStore, Transport};

use crate::config::CliConfig;
use crate::gotify_fmt::role_str;

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in and store a client token.
    Login {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password.
        #[arg(short, long, env = "GOTIFY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
///
/// A successful login records `server_url` in `config`; the caller persists it.
pub async fn run<T: Transport>(
    api: &RequestClient<T>,
    action: AuthAction,
    config: &mut CliConfig,
    server_url: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { username, password } => {
            if username.trim().is_empty() {
                anyhow::bail!("Username is required");
            }
            let client = api.login(username.trim(), &password).await?;
            config.server_url = Some(server_url.to_string());
            writeln!(out, "Logged in as {}", username.trim())?;
            writeln!(out, "Client: {} (#{})", client.name, client.id)?;
        }
        AuthAction::Logout | AuthAction::Status => {
            if !run_local(&action, api.session(), out)? {
                status(api, server_url, out).await?;
            }
        }
    }
    Ok(())
}

/// Handle the parts of `action` that only touch the stored session.
///
/// Returns `true` when nothing is left to ask the server: a logout, or a
/// status query without a session.
pub fn run_local(
    action: &AuthAction,
    session: &SessionStore,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match action {
        AuthAction::Logout => {
            session.logout()?;
            info!("Logged out");
            writeln!(out, "Logged out")?;
            Ok(true)
        }
        AuthAction::Status if !session.is_authenticated() => {
            writeln!(out, "Not logged in")?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn status<T: Transport>(
    api: &RequestClient<T>,
    server_url: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(client) = api.session().client() else {
        writeln!(out, "Not logged in")?;
        return Ok(());
    };
    match api.users().current().await {
        Ok(user) => {
            writeln!(out, "Logged in as: {} ({})", user.name, role_str(&user))?;
            writeln!(out, "Client: {} (#{})", client.name, client.id)?;
            writeln!(out, "Server: {server_url}")?;
        }
        Err(e) if e.is_auth_failure() => {
            warn!(error = %e, "Stored session rejected");
            writeln!(out, "Session expired, please log in again")?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use gotify_admin_core::SessionStore;
    use gotify_admin_core::testing::FakeGotify;

    use super::*;

    const URL: &str = "https://push.test";

    fn api() -> RequestClient<FakeGotify> {
        RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        )
    }

    async fn exec(
        api: &RequestClient<FakeGotify>,
        action: AuthAction,
        config: &mut CliConfig,
    ) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(api, action, config, URL, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn login(password: &str) -> AuthAction {
        AuthAction::Login {
            username: "admin".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_records_server_and_status_reports_user() {
        let api = api();
        let mut config = CliConfig::default();

        let out = exec(&api, login("admin"), &mut config).await.unwrap();
        assert!(out.starts_with("Logged in as admin\n"));
        assert_eq!(config.server_url.as_deref(), Some(URL));

        let out = exec(&api, AuthAction::Status, &mut config).await.unwrap();
        assert!(out.contains("Logged in as: admin (admin)"));
        assert!(out.contains("Client: gotify-admin"));
    }

    #[tokio::test]
    async fn failed_login_changes_nothing() {
        let api = api();
        let mut config = CliConfig::default();

        let err = exec(&api, login("wrong"), &mut config).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 401: invalid credentials");
        assert!(config.server_url.is_none());
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn status_without_session() {
        let api = api();
        let out = exec(&api, AuthAction::Status, &mut CliConfig::default())
            .await
            .unwrap();
        assert_eq!(out, "Not logged in\n");
        assert_eq!(api.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn logout_then_status() {
        let api = api();
        let mut config = CliConfig::default();
        exec(&api, login("admin"), &mut config).await.unwrap();

        let out = exec(&api, AuthAction::Logout, &mut config).await.unwrap();
        assert_eq!(out, "Logged out\n");
        let out = exec(&api, AuthAction::Status, &mut config).await.unwrap();
        assert_eq!(out, "Not logged in\n");
    }

    #[tokio::test]
    async fn revoked_session_is_reported() {
        let api = api();
        let mut config = CliConfig::default();
        exec(&api, login("admin"), &mut config).await.unwrap();
        let own = api.session().client().unwrap().id;
        api.clients().delete(own).await.unwrap();

        let out = exec(&api, AuthAction::Status, &mut config).await.unwrap();
        assert_eq!(out, "Session expired, please log in again\n");
    }

    #[test]
    fn logout_and_status_need_no_server() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::new(gotify_admin_core::FileStorage::new(
            dir.path().join("session.json"),
        ));
        session
            .persist(
                "Ctoken",
                &gotify_admin_core::ClientIdentity {
                    id: 4,
                    name: "gotify-admin".into(),
                },
            )
            .unwrap();

        let mut out = Vec::new();
        assert!(!run_local(&AuthAction::Status, &session, &mut out).unwrap());
        assert!(run_local(&AuthAction::Logout, &session, &mut out).unwrap());
        assert!(run_local(&AuthAction::Status, &session, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Logged out\nNot logged in\n");
        assert!(!session.is_authenticated());
    }
}

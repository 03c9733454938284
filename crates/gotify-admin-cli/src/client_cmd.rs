//! Client subcommands: list, get, create, update, delete.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use tracing::warn;

use gotify_admin_core::{RequestClient, Transport};

use crate::gotify_fmt::{write_client_detail, write_client_table};

/// Client subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ClientAction {
    /// List clients.
    List,
    /// Show a single client.
    Get {
        /// Client ID.
        id: u64,
    },
    /// Create a client and print its token.
    Create {
        /// Client name.
        name: String,
    },
    /// Rename a client.
    Update {
        /// Client ID.
        id: u64,
        /// New name.
        name: String,
    },
    /// Delete a client, revoking its token.
    Delete {
        /// Client ID.
        id: u64,
    },
}

/// Execute a client subcommand.
pub async fn run<T: Transport>(
    api: &RequestClient<T>,
    action: ClientAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let clients = api.clients();
    match action {
        ClientAction::List => write_client_table(out, &clients.list().await?)?,
        ClientAction::Get { id } => write_client_detail(out, &clients.get(id).await?)?,
        ClientAction::Create { name } => {
            let client = clients.create(&name).await?;
            writeln!(out, "Created client #{}", client.id)?;
            write_client_detail(out, &client)?;
        }
        ClientAction::Update { id, name } => {
            let client = clients.update(id, &name).await?;
            writeln!(out, "Updated client #{}", client.id)?;
            write_client_detail(out, &client)?;
        }
        ClientAction::Delete { id } => {
            if api.session().client().is_some_and(|own| own.id == id) {
                warn!(id, "Deleting the client this session logs in with");
            }
            clients.delete(id).await?;
            writeln!(out, "Deleted client #{id}")?;
        }
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

    async fn exec(api: &RequestClient<FakeGotify>, action: ClientAction) -> String {
        let mut out = Vec::new();
        run(api, action, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn create_rename_delete() {
        let api = RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        );
        api.login("admin", "admin").await.unwrap();

        let out = exec(&api, ClientAction::Create { name: "phone".into() }).await;
        assert!(out.contains("  Name:     phone"));
        let id = api
            .transport()
            .clients()
            .into_iter()
            .find(|c| c.name == "phone")
            .unwrap()
            .id;

        let out = exec(
            &api,
            ClientAction::Update {
                id,
                name: "tablet".into(),
            },
        )
        .await;
        assert!(out.contains("  Name:     tablet"));

        let out = exec(&api, ClientAction::Delete { id }).await;
        assert_eq!(out, format!("Deleted client #{id}\n"));

        let out = exec(&api, ClientAction::List).await;
        assert!(out.contains("gotify-admin"));
        assert!(!out.contains("tablet"));
    }
}

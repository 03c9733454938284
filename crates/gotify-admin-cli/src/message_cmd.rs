//! Message subcommands: list, delete, delete-all.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use gotify_admin_core::models::EnrichedMessage;
use gotify_admin_core::{RequestClient, Transport};

use crate::gotify_fmt::write_message_table;

/// Message subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum MessageAction {
    /// List the newest messages.
    List {
        /// Only messages of this application ID.
        #[arg(short, long)]
        app: Option<u64>,
        /// Maximum results (default: the configured message limit).
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Delete a single message.
    Delete {
        /// Message ID.
        id: u64,
    },
    /// Delete every message, or every message of one application.
    DeleteAll {
        /// Only messages of this application ID.
        #[arg(short, long)]
        app: Option<u64>,
    },
}

/// Execute a message subcommand.
///
/// `default_limit` bounds listings when no `--limit` is given, and always
/// bounds per-application deletion.
pub async fn run<T: Transport>(
    api: &RequestClient<T>,
    action: MessageAction,
    default_limit: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let messages = api.messages();
    match action {
        MessageAction::List { app, limit } => {
            let limit = limit.unwrap_or(default_limit);
            let apps = api.applications().list().await?;
            let list = match app {
                Some(app_id) => messages.list_by_application(app_id, limit).await?,
                None => messages.list(limit).await?,
            };
            write_message_table(out, &EnrichedMessage::enrich(list, &apps))?;
        }
        MessageAction::Delete { id } => {
            messages.delete(id).await?;
            writeln!(out, "Deleted message #{id}")?;
        }
        MessageAction::DeleteAll { app: None } => {
            messages.delete_all().await?;
            writeln!(out, "Deleted all messages")?;
        }
        MessageAction::DeleteAll { app: Some(app_id) } => {
            let count = messages
                .delete_all_by_application(app_id, default_limit)
                .await?;
            writeln!(out, "Deleted {count} message(s) of application #{app_id}")?;
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

    async fn exec(api: &RequestClient<FakeGotify>, action: MessageAction) -> String {
        let mut out = Vec::new();
        run(api, action, 100, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn list_filter_and_delete_all_by_application() {
        let api = RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        );
        api.login("admin", "admin").await.unwrap();
        let fake = api.transport();
        let ci = fake.add_application("ci", "");
        let backups = fake.add_application("backups", "");
        fake.add_message(ci.id, "build failed", "red", 8);
        fake.add_message(backups.id, "backup ok", "green", 1);
        fake.add_message(ci.id, "build fixed", "green", 2);

        let out = exec(
            &api,
            MessageAction::List {
                app: None,
                limit: None,
            },
        )
        .await;
        assert!(out.contains("3 message(s)"));

        let out = exec(
            &api,
            MessageAction::List {
                app: Some(ci.id),
                limit: Some(100),
            },
        )
        .await;
        assert!(out.contains("2 message(s)"));
        assert!(!out.contains("backup ok"));

        let out = exec(&api, MessageAction::DeleteAll { app: Some(ci.id) }).await;
        assert_eq!(
            out,
            format!("Deleted 2 message(s) of application #{}\n", ci.id)
        );
        assert_eq!(fake.messages().len(), 1);
    }

    #[tokio::test]
    async fn configured_limit_applies_without_flag() {
        let api = RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        );
        api.login("admin", "admin").await.unwrap();
        let fake = api.transport();
        let app = fake.add_application("cron", "");
        for i in 0..150 {
            fake.add_message(app.id, &format!("tick {i}"), "ok", 1);
        }

        let mut out = Vec::new();
        run(&api, MessageAction::List { app: None, limit: None }, 250, &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("150 message(s)"));
        assert_eq!(
            fake.requests().last().unwrap().path,
            "/message?limit=250"
        );

        let mut out = Vec::new();
        run(&api, MessageAction::DeleteAll { app: Some(app.id) }, 250, &mut out)
            .await
            .unwrap();
        assert!(fake.messages().is_empty());
    }
}

//! User subcommands: list, get, create, update, delete, whoami.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use gotify_admin_core::{RequestClient, Transport};

use crate::gotify_fmt::{write_user_detail, write_user_table};

/// User subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum UserAction {
    /// List users.
    List,
    /// Show a single user.
    Get {
        /// User ID.
        id: u64,
    },
    /// Show the user owning the current session.
    Whoami,
    /// Create a user.
    Create {
        /// Username.
        name: String,
        /// Password.
        #[arg(short, long)]
        password: String,
        /// Grant administrator rights.
        #[arg(long)]
        admin: bool,
    },
    /// Change a user's name, role or password.
    Update {
        /// User ID.
        id: u64,
        /// New username; unchanged when omitted.
        #[arg(short, long)]
        name: Option<String>,
        /// New password; unchanged when omitted.
        #[arg(short, long)]
        password: Option<String>,
        /// Administrator rights; unchanged when omitted.
        #[arg(long)]
        admin: Option<bool>,
    },
    /// Delete a user with all of their applications and clients.
    Delete {
        /// User ID.
        id: u64,
    },
}

/// Execute a user subcommand.
pub async fn run<T: Transport>(
    api: &RequestClient<T>,
    action: UserAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let users = api.users();
    match action {
        UserAction::List => write_user_table(out, &users.list().await?)?,
        UserAction::Get { id } => write_user_detail(out, &users.get(id).await?)?,
        UserAction::Whoami => write_user_detail(out, &users.current().await?)?,
        UserAction::Create {
            name,
            password,
            admin,
        } => {
            if password.is_empty() {
                anyhow::bail!("Password is required");
            }
            let user = users.create(&name, &password, admin).await?;
            writeln!(out, "Created user #{}", user.id)?;
            write_user_detail(out, &user)?;
        }
        UserAction::Update {
            id,
            name,
            password,
            admin,
        } => {
            let current = users.get(id).await?;
            let name = name.unwrap_or(current.name);
            let admin = admin.unwrap_or(current.admin);
            let password = password.filter(|p| !p.is_empty());
            let user = users.update(id, &name, password.as_deref(), admin).await?;
            writeln!(out, "Updated user #{}", user.id)?;
            write_user_detail(out, &user)?;
        }
        UserAction::Delete { id } => {
            users.delete(id).await?;
            writeln!(out, "Deleted user #{id}")?;
        }
    }
    Ok(())
}

//! Application subcommands: list, get, create, update, delete, image.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use gotify_admin_core::{FilePart, RequestClient, Transport};

use crate::gotify_fmt::{write_application_detail, write_application_table};

/// Application subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AppAction {
    /// List applications.
    List,
    /// Show a single application.
    Get {
        /// Application ID.
        id: u64,
    },
    /// Create an application.
    Create {
        /// Application name.
        name: String,
        /// Description.
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Rename or re-describe an application.
    Update {
        /// Application ID.
        id: u64,
        /// New name.
        #[arg(short, long)]
        name: String,
        /// New description.
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete an application and all of its messages.
    Delete {
        /// Application ID.
        id: u64,
    },
    /// Upload an icon for an application.
    UploadImage {
        /// Application ID.
        id: u64,
        /// Image file (png, jpg, gif, webp).
        file: PathBuf,
    },
    /// Reset an application to the default icon.
    DeleteImage {
        /// Application ID.
        id: u64,
    },
}

/// Execute an application subcommand.
pub async fn run<T: Transport>(
    api: &RequestClient<T>,
    base_url: &str,
    action: AppAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let apps = api.applications();
    match action {
        AppAction::List => {
            write_application_table(out, &apps.list().await?)?;
        }
        AppAction::Get { id } => {
            write_application_detail(out, &apps.get(id).await?, base_url)?;
        }
        AppAction::Create { name, description } => {
            let app = apps.create(&name, &description).await?;
            writeln!(out, "Created application #{}", app.id)?;
            write_application_detail(out, &app, base_url)?;
        }
        AppAction::Update {
            id,
            name,
            description,
        } => {
            let app = apps.update(id, &name, &description).await?;
            writeln!(out, "Updated application #{}", app.id)?;
            write_application_detail(out, &app, base_url)?;
        }
        AppAction::Delete { id } => {
            apps.delete(id).await?;
            writeln!(out, "Deleted application #{id}")?;
        }
        AppAction::UploadImage { id, file } => {
            let part = FilePart::from_path(&file)
                .with_context(|| format!("Cannot read {}", file.display()))?;
            let app = apps.upload_image(id, part).await?;
            writeln!(out, "Uploaded image for application #{}", app.id)?;
            write_application_detail(out, &app, base_url)?;
        }
        AppAction::DeleteImage { id } => {
            apps.delete_image(id).await?;
            writeln!(out, "Reset image of application #{id}")?;
        }
    }
    Ok(())
}

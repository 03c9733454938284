//! gotify-admin
//!
//! Terminal administration console for a Gotify server.
//! Runs the interactive TUI by default, or one-shot subcommands.

use std::io;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use gotify_admin_cli::app::Console;
use gotify_admin_cli::app_cmd::{self, AppAction};
use gotify_admin_cli::auth_cmd::{self, AuthAction};
use gotify_admin_cli::client_cmd::{self, ClientAction};
use gotify_admin_cli::config::CliConfig;
use gotify_admin_cli::connection::{self, ConnectionConfig};
use gotify_admin_cli::gotify_fmt::write_version;
use gotify_admin_cli::message_cmd::{self, MessageAction};
use gotify_admin_cli::tui;
use gotify_admin_cli::user_cmd::{self, UserAction};
use gotify_admin_core::tracing_init::{init_file_tracing, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "gotify-admin")]
#[command(version, about = "Gotify server administration console", long_about = None)]
struct Cli {
    /// Gotify server URL (saved on successful login)
    #[arg(long, global = true, env = "GOTIFY_URL")]
    url: Option<String>,

    /// Emit JSON log lines (subcommands only)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive console (default)
    Tui,
    /// Log in, log out, or show the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage applications
    App {
        #[command(subcommand)]
        action: AppAction,
    },
    /// Manage clients
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// List and delete messages
    Message {
        #[command(subcommand)]
        action: MessageAction,
    },
    /// Show the server version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load();
    let command = cli.command.unwrap_or(Commands::Tui);

    // The console owns the terminal, so it logs to a file instead of stderr.
    if matches!(command, Commands::Tui) {
        match CliConfig::log_path() {
            Some(path) => init_file_tracing("gotify_admin=warn", &path)?,
            None => init_tracing("gotify_admin=error", false),
        }
    } else {
        init_tracing("gotify_admin=info", cli.log_json);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "Starting gotify-admin");

    let mut out = io::stdout();
    if let Commands::Auth { action } = &command {
        let session = connection::open_session(CliConfig::session_path().as_deref());
        if auth_cmd::run_local(action, &session, &mut out)? {
            return Ok(());
        }
    }

    let conn = ConnectionConfig::from_cli(&config, cli.url.as_deref())?;
    let api = connection::connect(&conn)?;

    match command {
        Commands::Tui => {
            let mut console = Console::new(api, conn.server_url.clone(), config.message_limit);
            tui::run(&mut console).await?;
        }
        Commands::Auth { action } => {
            let before = config.clone();
            auth_cmd::run(&api, action, &mut config, &conn.server_url, &mut out).await?;
            if config != before {
                config
                    .save()
                    .unwrap_or_else(|e| warn!(error = %e, "Could not save config"));
            }
        }
        Commands::App { action } => app_cmd::run(&api, &conn.server_url, action, &mut out).await?,
        Commands::Client { action } => client_cmd::run(&api, action, &mut out).await?,
        Commands::User { action } => user_cmd::run(&api, action, &mut out).await?,
        Commands::Message { action } => {
            message_cmd::run(&api, action, config.message_limit, &mut out).await?;
        }
        Commands::Version => write_version(&mut out, &api.version().get().await?)?,
    }

    Ok(())
}

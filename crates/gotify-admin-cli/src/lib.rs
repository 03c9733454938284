//! gotify-admin CLI Library
//!
//! Terminal administration console for a Gotify server.
//! Provides both an interactive TUI (ratatui) and one-shot subcommands.

pub mod app;
pub mod app_cmd;
pub mod auth_cmd;
pub mod client_cmd;
pub mod config;
pub mod connection;
pub mod gotify_fmt;
pub mod message_cmd;
pub mod tui;
pub mod ui;
pub mod user_cmd;

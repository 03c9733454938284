//! Output formatting for the resource subcommands.

use std::io::{self, Write};

use gotify_admin_core::models::{
    Application, Client, EnrichedMessage, PriorityBand, User, VersionInfo,
};
use gotify_admin_core::services::image_url;

pub fn write_application_table(w: &mut impl Write, apps: &[Application]) -> io::Result<()> {
    if apps.is_empty() {
        return writeln!(w, "No applications found.");
    }
    writeln!(
        w,
        "{:<6} {:<24} {:<18} {:<4} {:<30}",
        "ID", "NAME", "TOKEN", "PRIO", "DESCRIPTION"
    )?;
    for app in apps {
        writeln!(
            w,
            "{:<6} {:<24} {:<18} {:<4} {:<30}",
            app.id,
            truncate(&app.name, 24),
            app.token,
            app.default_priority,
            truncate(&app.description, 30),
        )?;
    }
    writeln!(w, "\n{} application(s)", apps.len())
}

pub fn write_application_detail(
    w: &mut impl Write,
    app: &Application,
    base_url: &str,
) -> io::Result<()> {
    writeln!(w, "  ID:       {}", app.id)?;
    writeln!(w, "  Name:     {}", app.name)?;
    if !app.description.is_empty() {
        writeln!(w, "  Desc:     {}", app.description)?;
    }
    writeln!(w, "  Token:    {}", app.token)?;
    writeln!(w, "  Priority: {}", app.default_priority)?;
    if app.internal {
        writeln!(w, "  Internal: yes")?;
    }
    match image_url(base_url, &app.image) {
        Some(url) => writeln!(w, "  Image:    {url}")?,
        None => writeln!(w, "  Image:    default")?,
    }
    writeln!(w, "  Used:     {}", app.last_used.as_deref().unwrap_or("never"))?;
    Ok(())
}

pub fn write_client_table(w: &mut impl Write, clients: &[Client]) -> io::Result<()> {
    if clients.is_empty() {
        return writeln!(w, "No clients found.");
    }
    writeln!(w, "{:<6} {:<30} {:<18} {:<25}", "ID", "NAME", "TOKEN", "LAST USED")?;
    for client in clients {
        writeln!(
            w,
            "{:<6} {:<30} {:<18} {:<25}",
            client.id,
            truncate(&client.name, 30),
            client.token,
            client.last_used.as_deref().unwrap_or("never"),
        )?;
    }
    writeln!(w, "\n{} client(s)", clients.len())
}

pub fn write_client_detail(w: &mut impl Write, client: &Client) -> io::Result<()> {
    writeln!(w, "  ID:       {}", client.id)?;
    writeln!(w, "  Name:     {}", client.name)?;
    writeln!(w, "  Token:    {}", client.token)?;
    writeln!(
        w,
        "  Used:     {}",
        client.last_used.as_deref().unwrap_or("never")
    )?;
    Ok(())
}

pub const fn role_str(user: &User) -> &'static str {
    if user.admin { "admin" } else { "user" }
}

pub fn write_user_table(w: &mut impl Write, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(w, "No users found.");
    }
    writeln!(w, "{:<6} {:<30} {:<6}", "ID", "NAME", "ROLE")?;
    for user in users {
        writeln!(
            w,
            "{:<6} {:<30} {:<6}",
            user.id,
            truncate(&user.name, 30),
            role_str(user),
        )?;
    }
    writeln!(w, "\n{} user(s)", users.len())
}

pub fn write_user_detail(w: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(w, "  ID:       {}", user.id)?;
    writeln!(w, "  Name:     {}", user.name)?;
    writeln!(w, "  Role:     {}", role_str(user))?;
    Ok(())
}

pub fn write_message_table(w: &mut impl Write, messages: &[EnrichedMessage]) -> io::Result<()> {
    if messages.is_empty() {
        return writeln!(w, "No messages found.");
    }
    writeln!(
        w,
        "{:<6} {:<7} {:<16} {:<20} {:<40}",
        "ID", "PRIO", "APPLICATION", "DATE", "TITLE"
    )?;
    for entry in messages {
        let msg = &entry.message;
        writeln!(
            w,
            "{:<6} {:<7} {:<16} {:<20} {:<40}",
            msg.id,
            format!("{} {}", msg.priority, PriorityBand::of(msg.priority).label()),
            truncate(entry.application_name(), 16),
            truncate(&msg.date, 20),
            truncate(&msg.title, 40),
        )?;
    }
    writeln!(w, "\n{} message(s)", messages.len())
}

pub fn write_version(w: &mut impl Write, version: &VersionInfo) -> io::Result<()> {
    writeln!(w, "  Version:  {}", version.version)?;
    if !version.commit.is_empty() {
        writeln!(w, "  Commit:   {}", version.commit)?;
    }
    if !version.build_date.is_empty() {
        writeln!(w, "  Built:    {}", version.build_date)?;
    }
    Ok(())
}

pub fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max - 1).collect::<String>())
    }
}

//! Top-level frame layout: header tabs, banner, body and status bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use gotify_admin_core::Transport;

use super::dialogs::{draw_confirm, draw_form, form_lines};
use super::panels::{draw_messages_page, draw_resource_page};
use crate::app::{Console, Mode, Resource, ResourcePage, Route};

/// Draw the full UI.
pub fn draw<T: Transport>(frame: &mut Frame<'_>, console: &Console<T>) {
    match console.mode() {
        Mode::Checking => draw_checking(frame),
        Mode::Login => draw_login(frame, console),
        Mode::Browse | Mode::Form | Mode::Confirm => draw_console(frame, console),
    }
}

/// Rectangle of `width` x `height` centered in `area`, clamped to fit.
pub(super) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_checking(frame: &mut Frame<'_>) {
    let area = centered_rect(frame.area(), 30, 3);
    let text = Paragraph::new("Checking session...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

fn draw_login<T: Transport>(frame: &mut Frame<'_>, console: &Console<T>) {
    let form = &console.login;
    let mut lines = vec![
        Line::from(Span::styled(
            console.base_url().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(form_lines(form));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: log in | Tab: next field | Esc: quit",
        Style::default().fg(Color::DarkGray),
    )));

    #[allow(clippy::cast_possible_truncation)]
    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), 56, height);
    frame.render_widget(Clear, area);
    let login = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Gotify Login ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(login, area);
}

fn draw_console<T: Transport>(frame: &mut Frame<'_>, console: &Console<T>) {
    let banner = console.banner();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                           // Header
            Constraint::Length(u16::from(banner.is_some())), // Banner
            Constraint::Min(3),                              // Page
            Constraint::Length(1),                           // Status bar
        ])
        .split(frame.area());

    draw_header(frame, console, chunks[0]);
    if let Some(message) = banner {
        draw_banner(frame, message, chunks[1]);
    }
    match console.route {
        Route::Messages => draw_messages_page(frame, &console.messages, chunks[2]),
        Route::Applications => {
            draw_resource_page(frame, &console.applications, console.base_url(), chunks[2]);
        }
        Route::Clients => {
            draw_resource_page(frame, &console.clients, console.base_url(), chunks[2]);
        }
        Route::Users => draw_resource_page(frame, &console.users, console.base_url(), chunks[2]),
    }
    draw_status_bar(frame, console, chunks[3]);

    match console.route {
        Route::Messages => {
            if let Some(confirm) = &console.messages.confirm {
                draw_confirm(frame, confirm);
            }
        }
        Route::Applications => draw_modals(frame, &console.applications),
        Route::Clients => draw_modals(frame, &console.clients),
        Route::Users => draw_modals(frame, &console.users),
    }
}

fn draw_modals<R: Resource>(frame: &mut Frame<'_>, page: &ResourcePage<R>) {
    if let Some(confirm) = &page.confirm {
        draw_confirm(frame, confirm);
    } else if let Some(form) = &page.form {
        draw_form(frame, form);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_header<T: Transport>(frame: &mut Frame<'_>, console: &Console<T>, area: Rect) {
    let mut spans = vec![Span::styled(
        "Gotify ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for route in Route::ALL {
        let label = format!(" {} {} ", route.index() + 1, route.title());
        let style = if route == console.route {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }
    if console.loading() {
        spans.push(Span::styled(" [loading...]", Style::default().fg(Color::Yellow)));
    }

    let who = console
        .identity
        .as_ref()
        .map_or_else(String::new, |id| format!("{} | ", id.name));
    let version = &console.version.version;
    let right = if version == "N/A" {
        format!("{who}{version}")
    } else {
        format!("{who}v{version}")
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(UnicodeWidthStr::width(right.as_str()) as u16)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), halves[0]);
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        halves[1],
    );
}

fn draw_banner(frame: &mut Frame<'_>, message: &str, area: Rect) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(
            " ! ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {message}"), Style::default().fg(Color::Red)),
        Span::styled("  (x: dismiss)", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(banner, area);
}

fn status_hints(mode: Mode, route: Route) -> &'static str {
    match (mode, route) {
        (Mode::Form, _) => "Enter: save | Tab: next field | Space: toggle | Esc: cancel",
        (Mode::Confirm, _) => "y: confirm | n: cancel",
        (_, Route::Messages) => {
            "j/k: select | h/l: application | d: delete | D: delete all | n: new app | r: refresh | L: logout | q: quit"
        }
        (_, Route::Applications | Route::Clients) => {
            "j/k: select | n: new | e: edit | d: delete | t: token | r: refresh | L: logout | q: quit"
        }
        (_, Route::Users) => {
            "j/k: select | n: new | e: edit | d: delete | r: refresh | L: logout | q: quit"
        }
    }
}

fn draw_status_bar<T: Transport>(frame: &mut Frame<'_>, console: &Console<T>, area: Rect) {
    let status = Paragraph::new(Line::from(Span::styled(
        status_hints(console.mode(), console.route),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(status, area);
}

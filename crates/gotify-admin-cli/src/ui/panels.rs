//! Page bodies: resource list/detail panels and the messages dashboard.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use gotify_admin_core::models::{EnrichedMessage, PriorityBand};

use crate::app::resource::{avatar_slot, initials};
use crate::app::{MessagesPage, Resource, ResourcePage};

const AVATAR_PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
];

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn titled(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Title of a list panel, flagged while a fetch is in flight.
fn list_title(title: &str, count: usize, loading: bool) -> String {
    if loading {
        format!(" {title} (loading...) ")
    } else {
        format!(" {title} ({count}) ")
    }
}

pub(super) fn draw_resource_page<R: Resource>(
    frame: &mut Frame<'_>,
    page: &ResourcePage<R>,
    base_url: &str,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let block = titled(list_title(R::TITLE, page.items.len(), page.loading));
    if page.items.is_empty() && !page.loading {
        let empty = Paragraph::new(format!("No {}s yet. Press n to create one.", R::NOUN))
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(empty, columns[0]);
    } else {
        let items: Vec<ListItem<'_>> = page
            .items
            .iter()
            .map(|item| ListItem::new(item.list_label()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight())
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(page.selected_index());
        frame.render_stateful_widget(list, columns[0], &mut state);
    }

    draw_detail(frame, page, base_url, columns[1]);
}

fn draw_detail<R: Resource>(
    frame: &mut Frame<'_>,
    page: &ResourcePage<R>,
    base_url: &str,
    area: Rect,
) {
    let block = titled(" Details ".into());
    let Some(item) = page.selected_item() else {
        let hint = Paragraph::new(format!("Select a {} to see its details.", R::NOUN))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let avatar = AVATAR_PALETTE[avatar_slot(item.name(), AVATAR_PALETTE.len())];
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", initials(item.name())),
                Style::default()
                    .fg(Color::Black)
                    .bg(avatar)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", item.name()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    for (label, value) in item.detail_rows(base_url, page.reveal_token) {
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ]));
    }
    if let Some(usage) = item.usage(base_url, page.reveal_token) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Send a message:",
            Style::default().fg(Color::Gray),
        )));
        lines.extend(
            usage
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Green)))),
        );
    }

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

const fn band_color(band: PriorityBand) -> Color {
    match band {
        PriorityBand::Low => Color::DarkGray,
        PriorityBand::Medium => Color::Yellow,
        PriorityBand::High => Color::Red,
    }
}

/// Short local form of an RFC 3339 timestamp, e.g. `2024-05-01 12:30`.
fn short_date(date: &str) -> String {
    date.get(..16).unwrap_or(date).replacen('T', " ", 1)
}

fn message_item(entry: &EnrichedMessage) -> ListItem<'static> {
    let msg = &entry.message;
    let band = PriorityBand::of(msg.priority);
    let title = if msg.title.is_empty() {
        entry.application_name().to_string()
    } else {
        msg.title.clone()
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:<6} ", band.label()),
            Style::default().fg(band_color(band)),
        ),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {} | {}", entry.application_name(), short_date(&msg.date)),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    lines.extend(
        msg.message
            .lines()
            .map(|l| Line::from(format!("       {l}"))),
    );
    ListItem::new(lines)
}

pub(super) fn draw_messages_page(frame: &mut Frame<'_>, page: &MessagesPage, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(area);

    let sidebar: Vec<ListItem<'_>> = page
        .sidebar()
        .map(|app| ListItem::new(app.map_or("All messages", |a| a.name.as_str())))
        .collect();
    let selected = page
        .filter
        .and_then(|id| page.applications.iter().position(|a| a.id == id))
        .map_or(0, |i| i + 1);
    let mut sidebar_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(
        List::new(sidebar)
            .block(titled(" Applications ".into()))
            .highlight_style(highlight()),
        columns[0],
        &mut sidebar_state,
    );

    let title = page.filter_name().unwrap_or("All messages");
    let block = titled(list_title(title, page.messages.len(), page.loading));
    if page.messages.is_empty() && !page.loading {
        let empty = Paragraph::new("No messages.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, columns[1]);
        return;
    }
    let items: Vec<ListItem<'_>> = page.messages.iter().map(message_item).collect();
    let selected = page
        .selected
        .and_then(|id| page.messages.iter().position(|m| m.message.id == id));
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray)),
        columns[1],
        &mut state,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_date_drops_seconds_and_zone() {
        assert_eq!(short_date("2024-05-01T12:30:45.123Z"), "2024-05-01 12:30");
        assert_eq!(short_date("soon"), "soon");
    }

    #[test]
    fn list_title_shows_count_or_loading() {
        assert_eq!(list_title("Clients", 3, false), " Clients (3) ");
        assert_eq!(list_title("Clients", 3, true), " Clients (loading...) ");
    }
}

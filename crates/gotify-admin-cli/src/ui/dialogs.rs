//! Modal overlays: create/edit forms and delete confirmations.

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::render::centered_rect;
use crate::app::{ConfirmState, FieldKind, FormState, Tone};

/// Field rows of `form`, with the focused field marked and secrets masked.
pub(super) fn form_lines(form: &FormState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (spec, value)) in form.entries().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "> " } else { "  " };
        let required = if spec.required { "*" } else { "" };
        let shown = match spec.kind {
            FieldKind::Text => value.to_string(),
            FieldKind::Secret => "•".repeat(value.chars().count()),
            FieldKind::Toggle => {
                if value.is_empty() { "[ ]" } else { "[x]" }.to_string()
            }
        };
        let cursor = if focused && spec.kind != FieldKind::Toggle {
            "_"
        } else {
            ""
        };
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}{required}: ", spec.label), label_style),
            Span::raw(shown),
            Span::styled(cursor, Style::default().fg(Color::White)),
        ]));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn draw_form(frame: &mut Frame<'_>, form: &FormState) {
    let mut lines = form_lines(form);
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[Enter]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}  ", form.mode.verb())),
        Span::styled(
            "[Esc]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Cancel"),
    ]));

    let area = centered_rect(frame.area(), 64, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", form.title))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}

const fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Danger => Color::Red,
        Tone::Warning => Color::Yellow,
    }
}

pub(super) fn draw_confirm<A>(frame: &mut Frame<'_>, confirm: &ConfirmState<A>) {
    let color = tone_color(confirm.tone);
    let mut lines = vec![Line::from(confirm.message.clone()), Line::from("")];
    if confirm.busy {
        lines.push(Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(
                "[Y]",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Confirm  "),
            Span::styled(
                "[N]",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Cancel"),
        ]));
    }

    let area = centered_rect(frame.area(), 60, 7);
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", confirm.title))
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}

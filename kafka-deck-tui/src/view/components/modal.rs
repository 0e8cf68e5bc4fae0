//! Modal overlays

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::popup::Modal;
use crate::model::wizard::{ConfirmDialog, FieldKind, Form};
use crate::model::App;
use crate::view::theme::colors;

const MODAL_WIDTH: u16 = 64;

pub fn render(app: &App, frame: &mut Frame) {
    let Some(modal) = app.popup.active() else {
        return;
    };

    match modal {
        Modal::Confirm(dialog) => render_confirm(frame, dialog),
        other => {
            if let Some(form) = other.form() {
                render_form(frame, form, app.popup.error());
            }
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn frame_block(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(colors().modal_bg))
}

fn draw(frame: &mut Frame, block: Block<'static>, lines: Vec<Line<'static>>) {
    // content + top/bottom border + one line padding
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(3);
    let area = centered_rect(MODAL_WIDTH, height, frame.area());
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Shown value of a field; secrets are masked.
fn display_value(value: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Secret => "•".repeat(value.chars().count().min(32)),
        FieldKind::Text | FieldKind::Choice(_) => value.to_string(),
    }
}

fn render_form(frame: &mut Frame, form: &dyn Form, submit_error: Option<&str>) {
    let c = colors();
    let label_style = Style::default().fg(Color::Gray);
    let done_style = Style::default().fg(c.muted);
    let active_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let history = form.history();
    let current = history.len().saturating_sub(1);
    let mut lines = vec![Line::from("")];

    for (i, (label, value, kind)) in history.into_iter().enumerate() {
        let shown = display_value(value, kind);
        if i == current {
            lines.push(Line::styled(format!("  {label}"), label_style));
            let body = match kind {
                FieldKind::Choice(options) => {
                    let position = options.iter().position(|o| *o == value).map_or(0, |p| p + 1);
                    format!("    ◀ {shown} ▶   ({position}/{})", options.len())
                }
                FieldKind::Text | FieldKind::Secret => format!("    {shown}▎"),
            };
            lines.push(Line::styled(body, active_style));
        } else {
            lines.push(Line::styled(format!("  {label}: {shown}"), done_style));
        }
    }

    let errors = form.errors();
    if !errors.is_empty() || submit_error.is_some() {
        lines.push(Line::from(""));
    }
    for (_, message) in errors.iter() {
        lines.push(Line::styled(
            format!("  ⚠ {message}"),
            Style::default().fg(c.error),
        ));
    }
    if let Some(err) = submit_error {
        lines.push(Line::styled(format!("  ⚠ {err}"), Style::default().fg(c.error)));
    }

    lines.push(Line::from(""));
    lines.push(hint_line(&[
        ("Enter", "Next"),
        ("S-Tab", "Back"),
        ("←→", "Choose"),
        ("Esc", "Cancel"),
    ]));

    draw(frame, frame_block(form.title(), Color::Cyan), lines);
}

fn render_confirm(frame: &mut Frame, dialog: &ConfirmDialog) {
    let c = colors();
    let lines = vec![
        Line::from(""),
        Line::styled(format!("  {}", dialog.message), Style::default().fg(c.fg)),
        Line::from(""),
        hint_line(&[("y/Enter", "Confirm"), ("n/Esc", "Cancel")]),
    ];
    draw(frame, frame_block(&dialog.title, c.warning), lines);
}

fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(format!(" {desc}"), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

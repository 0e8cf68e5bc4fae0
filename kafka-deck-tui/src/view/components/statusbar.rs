//! Bottom status bar

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::{App, PanelId};
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();

    // An error replaces the hints until the next status
    if let Some(err) = &app.error_message {
        spans.push(Span::styled(
            format!(" Error: {err}"),
            Style::default()
                .fg(colors().error)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)).style(Styles::statusbar()), area);
        return;
    }

    for (i, (key, desc)) in hints(app).iter().enumerate() {
        spans.push(Span::styled(if i == 0 { " " } else { " │ " }, Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(*key, Styles::hint_key()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, Styles::hint_desc()));
    }

    if let Some(msg) = &app.status_message {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(msg.clone(), Style::default().fg(colors().success)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Styles::statusbar()), area);
}

fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.popup.is_active() {
        return vec![
            ("Enter", "Next/Submit"),
            ("S-Tab", "Back"),
            ("←→", "Choose"),
            ("Esc", "Cancel"),
        ];
    }

    let mut hints = vec![("↑↓", "Select")];
    match app.focus {
        PanelId::Brokers => hints.extend([("n", "New Broker"), ("e", "Edit File")]),
        PanelId::Topics => hints.extend([
            ("n", "New"),
            ("d", "Delete"),
            ("p", "Produce"),
            ("c", "Config"),
            ("m", "Messages"),
            ("Tab", "Tab"),
        ]),
        PanelId::ConsumerGroups | PanelId::SchemaRegistry => {}
        PanelId::MessageBrowser => {
            hints.extend([("Enter", "Open"), ("r", "Refresh"), ("p", "Produce"), ("Esc", "Back")]);
            return hints;
        }
        PanelId::MessageDetail => {
            return vec![("↑↓", "Scroll"), ("PgUp/PgDn", "Page"), ("Esc", "Back")];
        }
    }
    hints.extend([("←→", "Switch Panels"), ("1-4", "Jump"), ("q", "Quit")]);
    hints
}

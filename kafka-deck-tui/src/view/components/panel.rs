//! Panel widgets driven by `PanelViewModel`

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::model::panels::PanelViewModel;
use crate::view::theme::{colors, Styles};

fn block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border(focused))
}

/// Selectable list panel.
pub fn render_list(
    panel: &dyn PanelViewModel,
    prefix: &str,
    focused: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let c = colors();
    let rows = panel.display_rows();
    let block = block(format!("{prefix}{}", panel.title()), focused);

    if rows.is_empty() {
        let empty = Paragraph::new(Line::styled("  (empty)", Style::default().fg(c.muted)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let selected = panel.selected_index();
    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let marker = if Some(i) == selected { "▶ " } else { "  " };
            ListItem::new(Line::from(Span::styled(
                format!("{marker}{row}"),
                Style::default().fg(c.fg),
            )))
        })
        .collect();

    // Selection only stands out on the focused panel
    let highlight = if focused {
        Styles::selected()
    } else {
        Style::default().fg(c.highlight)
    };
    let list = List::new(items).block(block).highlight_style(highlight);

    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Read-only text panel (detail panes, message detail).
pub fn render_text(panel: &dyn PanelViewModel, focused: bool, frame: &mut Frame, area: Rect) {
    let c = colors();
    let lines: Vec<Line> = panel
        .display_rows()
        .into_iter()
        .map(|row| Line::styled(row, Style::default().fg(c.fg)))
        .collect();
    let paragraph = Paragraph::new(lines).block(block(panel.title(), focused));
    frame.render_widget(paragraph, area);
}

/// Shown when the focused sidebar panel has no detail pane.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let c = colors();
    let key = Styles::hint_key();
    let desc = Style::default().fg(c.fg);
    let entry = |k: &'static str, d: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), key),
            Span::styled(d, desc),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::styled("  Select a broker to connect", Style::default().fg(c.muted)),
        Line::from(""),
        entry("↑↓ / jk", "Move selection"),
        entry("←→ / hl", "Switch panel"),
        entry("1-4", "Jump to panel"),
        entry("n", "New broker / topic"),
        entry("d", "Delete topic"),
        entry("p", "Produce message"),
        entry("c", "Edit topic config"),
        entry("m", "Browse messages"),
        entry("Tab", "Next detail tab"),
        entry("q", "Quit"),
    ];
    frame.render_widget(Paragraph::new(lines).block(block("Help".to_string(), false)), area);
}

//! Main layout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::{App, MessageView, PanelId};

use super::components;
use super::theme::colors;

pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    // title bar + content + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    render_title_bar(app, frame, main_layout[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_layout[1]);

    render_sidebar(app, frame, columns[0]);
    render_main_pane(app, frame, columns[1]);

    components::statusbar::render(app, frame, main_layout[2]);

    // Modal on top of everything
    components::modal::render(app, frame);
}

fn render_title_bar(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let style = Style::default().bg(c.highlight).fg(c.selected_fg);
    let broker = app
        .main
        .active_broker()
        .map_or_else(|| "not connected".to_string(), |b| format!("broker: {b}"));

    let line = Line::from(vec![
        Span::raw(concat!(" Kafka Deck v", env!("CARGO_PKG_VERSION"))),
        Span::raw("  │  "),
        Span::raw(broker),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}

fn render_sidebar(app: &App, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ])
        .split(area);

    for (i, (panel, area)) in PanelId::SIDEBAR.into_iter().zip(rows.iter()).enumerate() {
        components::panel::render_list(
            app.panel(panel).as_ref(),
            &format!("[{}] ", i + 1),
            app.focus == panel && !app.popup.is_active(),
            frame,
            *area,
        );
    }
}

fn render_main_pane(app: &App, frame: &mut Frame, area: Rect) {
    let focused = |panel: PanelId| app.focus == panel && !app.popup.is_active();
    match app.message_view {
        MessageView::Hidden => {
            if let Some(detail) = app.detail(app.sidebar_focus()) {
                components::panel::render_text(detail.as_ref(), false, frame, area);
            } else {
                components::panel::render_help(frame, area);
            }
        }
        MessageView::Browser => components::panel::render_list(
            app.panel(PanelId::MessageBrowser).as_ref(),
            "",
            focused(PanelId::MessageBrowser),
            frame,
            area,
        ),
        MessageView::Detail => components::panel::render_text(
            app.panel(PanelId::MessageDetail).as_ref(),
            focused(PanelId::MessageDetail),
            frame,
            area,
        ),
    }
}

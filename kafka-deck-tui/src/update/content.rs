use std::sync::Arc;

use crossterm::event::KeyEvent;
use kafka_deck_core::types::Topic;

use super::report;
use crate::error::{UiError, UiResult};
use crate::message::ContentMessage;
use crate::model::wizard::ConfirmAction;
use crate::model::{App, MessageView, PanelId};

pub fn update(app: &mut App, msg: ContentMessage) {
    match msg {
        ContentMessage::PanelKey(key) => handle_panel_key(app, key),
        ContentMessage::New => handle_new(app),
        ContentMessage::Delete => with_topic(app, "delete topic", |app, topic| {
            let message = format!("Delete topic '{}'? (y/n)", topic.name);
            app.popup
                .show_confirm_popup(app.focus, &message, ConfirmAction::DeleteTopic(topic.name));
            Ok(())
        }),
        ContentMessage::Produce => with_topic(app, "produce message", |app, topic| {
            app.popup.show_produce_message_popup(app.focus, &topic.name);
            Ok(())
        }),
        ContentMessage::EditConfig => with_topic(app, "load topic config", |app, topic| {
            app.main.load_topic_config(topic.name).map(drop)
        }),
        ContentMessage::BrowseMessages => handle_browse_messages(app),
        ContentMessage::NextTab => {
            if app.focus == PanelId::Topics {
                app.main.topic_detail.next_tab();
            }
        }
        ContentMessage::ShowMessageDetail => {
            app.message_view = MessageView::Detail;
            app.focus = PanelId::MessageDetail;
        }
        ContentMessage::CloseMessageDetail => {
            app.message_view = MessageView::Browser;
            app.focus = PanelId::MessageBrowser;
        }
        ContentMessage::CloseMessages => {
            app.message_view = MessageView::Hidden;
            app.focus = PanelId::Topics;
        }
    }
    app.redraw.mark();
}

/// Run the first binding of the focused panel that matches `key`.
fn handle_panel_key(app: &mut App, key: KeyEvent) {
    let panel = app.panel(app.focus);
    let Some(binding) = panel.command_bindings().into_iter().find(|b| b.key.matches(&key)) else {
        return;
    };
    let redraw = app.redraw.clone();
    let command = binding.command.with_on_completed(move || redraw.mark());
    if let Err(e) = command.execute() {
        report(app, binding.name, &e);
    }
}

fn handle_new(app: &mut App) {
    match app.focus {
        PanelId::Brokers => {
            let existing = app.main.profiles().into_iter().map(|p| p.name).collect();
            app.popup.show_add_broker_popup(app.focus, existing);
        }
        PanelId::Topics => {
            app.popup.show_add_topic_popup(app.focus);
        }
        _ => {}
    }
}

/// Apply `action` to the selected topic, if any.
fn with_topic<F>(app: &mut App, context: &str, action: F)
where
    F: FnOnce(&mut App, Topic) -> UiResult<()>,
{
    if !matches!(app.focus, PanelId::Topics | PanelId::MessageBrowser) {
        return;
    }
    let selected = app.main.topics.selected_topic();
    let result = match selected {
        Some(topic) => action(app, topic),
        None => Err(UiError::NoSelection),
    };
    if let Err(e) = result {
        report(app, context, &e);
    }
}

fn handle_browse_messages(app: &mut App) {
    if app.focus != PanelId::Topics {
        return;
    }
    let Some(topic) = app.main.topics.selected_topic() else {
        return;
    };
    let browser = Arc::clone(&app.main.message_browser);
    browser.set_topic(Some(topic.name));
    app.message_view = MessageView::Browser;
    app.focus = PanelId::MessageBrowser;
    if let Err(e) = browser.refresh() {
        report(app, "failed to load messages", &e);
    }
}

//! Update layer
//!
//! The only place that mutates [`App`]. Runs on the UI thread, both for key-driven
//! messages and for messages drained from the [`UiQueue`](crate::event::UiQueue).
//! Background work is started through the view models and reports back as messages.

mod content;
mod modal;
mod navigation;

use crate::error::UiError;
use crate::message::AppMessage;
use crate::model::App;

pub fn update(app: &mut App, msg: AppMessage) {
    match msg {
        AppMessage::Quit => {
            app.should_quit = true;
        }
        AppMessage::Navigation(nav_msg) => {
            navigation::update(app, nav_msg);
        }
        AppMessage::Content(content_msg) => {
            content::update(app, content_msg);
        }
        AppMessage::Modal(modal_msg) => {
            modal::update(app, modal_msg);
        }
        AppMessage::EditProfiles => {
            tracing::info!("profile editor requested");
            app.edit_profiles = true;
        }
        AppMessage::TopicConfigLoaded(config) => {
            if app.popup.show_topic_config_popup(app.focus, &config) {
                app.redraw.mark();
            }
        }
        AppMessage::Status(message) => {
            app.set_status(message);
        }
        AppMessage::ReportError(message) => {
            app.set_error(message);
        }
        AppMessage::Redraw => {
            app.redraw.mark();
        }
        AppMessage::Noop => {}
    }
}

/// Log and surface `err` on the status line. Silent errors are dropped.
fn report(app: &mut App, context: &str, err: &UiError) {
    if err.is_silent() {
        return;
    }
    err.log(context);
    app.set_error(err.to_string());
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use kafka_deck_core::testing::{MemoryCredentialStore, MemoryProfileRepository, RecordingClientFactory};
    use kafka_deck_core::types::Topic;

    use super::*;
    use crate::event::{UiQueue, UiScheduler};
    use crate::message::{ContentMessage, ModalMessage, NavigationMessage};
    use crate::model::context::ViewContext;
    use crate::model::popup::Modal;
    use crate::model::{MainViewModel, PanelId, Services};

    fn app() -> (App, UiQueue) {
        let (scheduler, queue): (UiScheduler, UiQueue) = UiQueue::new();
        let ctx = ViewContext::new(
            scheduler,
            tokio::runtime::Handle::current(),
            Arc::new(|_: UiError| {}),
        );
        let services = Services {
            factory: Arc::new(RecordingClientFactory::new()),
            profiles: Arc::new(MemoryProfileRepository::new()),
            credentials: Arc::new(MemoryCredentialStore::new()),
        };
        (App::new(MainViewModel::new(ctx, services, 100)), queue)
    }

    fn key(c: char) -> AppMessage {
        AppMessage::Content(ContentMessage::PanelKey(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
    }

    fn topics(names: &[&str]) -> Vec<Topic> {
        names
            .iter()
            .map(|n| Topic {
                name: (*n).to_string(),
                ..Topic::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn cancelling_a_popup_restores_focus() {
        let (mut app, _queue) = app();
        update(&mut app, AppMessage::Navigation(NavigationMessage::FocusPanel(PanelId::Topics)));
        update(&mut app, AppMessage::Content(ContentMessage::New));
        assert!(matches!(app.popup.active(), Some(Modal::AddTopic(_))));

        app.focus = PanelId::Brokers;
        update(&mut app, AppMessage::Modal(ModalMessage::Close));
        assert!(!app.popup.is_active());
        assert_eq!(app.focus, PanelId::Topics);
    }

    #[tokio::test]
    async fn new_on_brokers_opens_broker_wizard_once() {
        let (mut app, _queue) = app();
        update(&mut app, AppMessage::Content(ContentMessage::New));
        update(&mut app, AppMessage::Modal(ModalMessage::Input('x')));
        update(&mut app, AppMessage::Content(ContentMessage::New));

        let Some(Modal::AddBroker(wizard)) = app.popup.active() else {
            panic!("broker wizard should be open");
        };
        assert_eq!(wizard.value(), "x");
    }

    #[tokio::test]
    async fn panel_keys_run_bindings_and_swallow_no_selection() {
        let (mut app, _queue) = app();
        app.main.topics.load(topics(&["a", "b"]));
        app.focus = PanelId::Topics;
        app.redraw.take();

        update(&mut app, key('j'));
        assert_eq!(app.main.topics.list.selected_index(), Some(1));
        assert!(app.redraw.take());

        update(&mut app, key('j'));
        assert_eq!(app.main.topics.list.selected_index(), Some(1));
        assert!(app.error_message.is_none());
    }

    #[tokio::test]
    async fn submit_without_connection_keeps_popup_open() {
        let (mut app, _queue) = app();
        app.main.topics.load(topics(&["orders"]));
        app.focus = PanelId::Topics;

        update(&mut app, AppMessage::Content(ContentMessage::Delete));
        assert!(matches!(app.popup.active(), Some(Modal::Confirm(_))));
        update(&mut app, AppMessage::Modal(ModalMessage::Confirm));

        assert!(app.popup.is_active());
        assert_eq!(app.popup.error(), Some("no active kafka client"));
    }

    #[tokio::test]
    async fn edit_key_on_brokers_requests_the_editor() {
        let (mut app, mut queue) = app();
        app.focus = PanelId::Brokers;

        update(&mut app, key('e'));
        let queued = queue.drain();
        assert!(matches!(queued.as_slice(), [AppMessage::EditProfiles]));
        assert!(!app.edit_profiles);

        for msg in queued {
            update(&mut app, msg);
        }
        assert!(app.take_edit_request());
        assert!(!app.take_edit_request());
    }

    #[tokio::test]
    async fn message_views_open_and_close() {
        let (mut app, _queue) = app();
        app.main.topics.load(topics(&["orders"]));
        app.focus = PanelId::Topics;

        update(&mut app, AppMessage::Content(ContentMessage::BrowseMessages));
        assert_eq!(app.focus, PanelId::MessageBrowser);
        assert!(app.error_message.is_some());

        update(&mut app, AppMessage::Content(ContentMessage::ShowMessageDetail));
        assert_eq!(app.focus, PanelId::MessageDetail);
        update(&mut app, AppMessage::Content(ContentMessage::CloseMessages));
        assert_eq!(app.focus, PanelId::Topics);
        assert!(!app.is_available(PanelId::MessageBrowser));
    }
}

//! Event handling
//!
//! Translates terminal events into [`AppMessage`]s. Routing order: an open popup takes
//! every key, then the message views, then global keys, and whatever is left goes to the
//! focused panel's command bindings.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::event::DefaultKeymap;
use crate::message::{AppMessage, ContentMessage, ModalMessage, NavigationMessage};
use crate::model::popup::Modal;
use crate::model::{App, PanelId};

/// Wait up to `timeout` for an event.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(event: Event, app: &App) -> AppMessage {
    match event {
        Event::Key(key) => handle_key_event(key, app),
        Event::Resize(_, _) => AppMessage::Redraw,
        _ => AppMessage::Noop,
    }
}

fn handle_key_event(key: KeyEvent, app: &App) -> AppMessage {
    // Press only; some terminals also report Release and Repeat
    if key.kind != KeyEventKind::Press {
        return AppMessage::Noop;
    }

    if app.popup.is_active() {
        return handle_modal_keys(key, app);
    }

    if DefaultKeymap::FORCE_QUIT.matches(&key) {
        return AppMessage::Quit;
    }

    match app.focus {
        PanelId::MessageBrowser => handle_message_browser_keys(key),
        PanelId::MessageDetail => AppMessage::Content(ContentMessage::PanelKey(key)),
        _ => handle_sidebar_keys(key),
    }
}

fn handle_message_browser_keys(key: KeyEvent) -> AppMessage {
    if DefaultKeymap::BACK.matches(&key) || DefaultKeymap::QUIT.matches(&key) {
        return AppMessage::Content(ContentMessage::CloseMessages);
    }
    if DefaultKeymap::ACTION_PRODUCE.matches(&key) {
        return AppMessage::Content(ContentMessage::Produce);
    }
    AppMessage::Content(ContentMessage::PanelKey(key))
}

fn handle_sidebar_keys(key: KeyEvent) -> AppMessage {
    if DefaultKeymap::QUIT.matches(&key) {
        return AppMessage::Quit;
    }
    if DefaultKeymap::FOCUS_LEFT.matches(&key) || DefaultKeymap::FOCUS_LEFT_VI.matches(&key) {
        return AppMessage::Navigation(NavigationMessage::FocusPrev);
    }
    if DefaultKeymap::FOCUS_RIGHT.matches(&key) || DefaultKeymap::FOCUS_RIGHT_VI.matches(&key) {
        return AppMessage::Navigation(NavigationMessage::FocusNext);
    }
    if DefaultKeymap::NEXT_TAB.matches(&key) {
        return AppMessage::Content(ContentMessage::NextTab);
    }
    if DefaultKeymap::ACTION_NEW.matches(&key) {
        return AppMessage::Content(ContentMessage::New);
    }
    if DefaultKeymap::ACTION_DELETE.matches(&key) {
        return AppMessage::Content(ContentMessage::Delete);
    }
    if DefaultKeymap::ACTION_PRODUCE.matches(&key) {
        return AppMessage::Content(ContentMessage::Produce);
    }
    if DefaultKeymap::ACTION_CONFIG.matches(&key) {
        return AppMessage::Content(ContentMessage::EditConfig);
    }
    if DefaultKeymap::ACTION_MESSAGES.matches(&key) {
        return AppMessage::Content(ContentMessage::BrowseMessages);
    }

    // 1-4: jump to a sidebar panel
    if let (KeyModifiers::NONE, KeyCode::Char(c)) = (key.modifiers, key.code) {
        if let Some(panel) = c.to_digit(10).and_then(PanelId::from_shortcut) {
            return AppMessage::Navigation(NavigationMessage::FocusPanel(panel));
        }
    }

    AppMessage::Content(ContentMessage::PanelKey(key))
}

fn handle_modal_keys(key: KeyEvent, app: &App) -> AppMessage {
    // Esc and Ctrl+C always close
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
            return AppMessage::Modal(ModalMessage::Close);
        }
        _ => {}
    }

    if let Some(Modal::Confirm(_)) = app.popup.active() {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y' | 'Y') => AppMessage::Modal(ModalMessage::Confirm),
            KeyCode::Char('n' | 'N') => AppMessage::Modal(ModalMessage::Close),
            _ => AppMessage::Noop,
        };
    }

    match key.code {
        KeyCode::Enter | KeyCode::Tab => AppMessage::Modal(ModalMessage::Confirm),
        KeyCode::BackTab => AppMessage::Modal(ModalMessage::PrevStep),
        KeyCode::Up | KeyCode::Left => AppMessage::Modal(ModalMessage::CyclePrev),
        KeyCode::Down | KeyCode::Right => AppMessage::Modal(ModalMessage::CycleNext),
        KeyCode::Backspace => AppMessage::Modal(ModalMessage::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            AppMessage::Modal(ModalMessage::Input(c))
        }
        _ => AppMessage::Noop,
    }
}

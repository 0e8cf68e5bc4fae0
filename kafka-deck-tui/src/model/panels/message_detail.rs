//! Single message view

use std::sync::{Arc, PoisonError, RwLock};

use crossterm::event::KeyCode;
use kafka_deck_core::types::Message;

use super::{movement_bindings, PanelViewModel};
use crate::error::UiResult;
use crate::event::KeyBinding;
use crate::model::command::{Command, CommandBinding};
use crate::model::notifier::{ChangeField, ChangeHandler, Notifier};

const SCROLL_PAGE: isize = 10;

type CloseHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct DetailState {
    message: Option<Message>,
    lines: Vec<String>,
    scroll: usize,
}

#[derive(Default)]
pub struct MessageDetailViewModel {
    state: RwLock<DetailState>,
    notifier: Notifier,
    on_close: RwLock<Option<CloseHook>>,
}

impl MessageDetailViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_close<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_close.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
    }

    pub fn set_message(&self, message: Option<Message>) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.lines = build_display_text(message.as_ref());
            state.message = message;
            state.scroll = 0;
        }
        self.notifier.notify(ChangeField::Items);
    }

    pub fn message(&self) -> Option<Message> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .message
            .clone()
    }

    #[cfg(test)]
    pub fn scroll_position(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).scroll
    }

    fn scroll_by(&self, delta: isize) -> UiResult<()> {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let max = state.lines.len().saturating_sub(1);
            state.scroll = state.scroll.saturating_add_signed(delta).min(max);
        }
        self.notifier.notify(ChangeField::Custom("scroll"));
        Ok(())
    }

    pub fn scroll_up(&self) -> UiResult<()> {
        self.scroll_by(-1)
    }

    pub fn scroll_down(&self) -> UiResult<()> {
        self.scroll_by(1)
    }

    pub fn close(&self) -> UiResult<()> {
        let hook = self
            .on_close
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(())
    }
}

fn build_display_text(message: Option<&Message>) -> Vec<String> {
    let Some(m) = message else {
        return vec!["No message selected".to_string()];
    };
    let separator = "-".repeat(60);
    let section = |lines: &mut Vec<String>, name: &str| {
        lines.push(separator.clone());
        lines.push(name.to_string());
        lines.push(separator.clone());
    };

    let mut lines = Vec::new();
    section(&mut lines, "METADATA");
    lines.push(format!("  Topic:      {}", m.topic));
    lines.push(format!("  Partition:  {}", m.partition));
    lines.push(format!("  Offset:     {}", m.offset));
    lines.push(format!("  Timestamp:  {}", m.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")));
    lines.push(String::new());

    if !m.headers.is_empty() {
        section(&mut lines, "HEADERS");
        lines.extend(m.headers.iter().map(|h| format!("  {}: {}", h.key, h.value)));
        lines.push(String::new());
    }

    section(&mut lines, "KEY");
    lines.push(if m.key.is_empty() {
        "  (null)".to_string()
    } else {
        format!("  {}", m.key)
    });
    lines.push(String::new());

    section(&mut lines, "VALUE");
    if m.value.is_empty() {
        lines.push("  (null)".to_string());
    } else {
        let pretty = serde_json::from_str::<serde_json::Value>(&m.value)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or_else(|_| m.value.clone());
        lines.extend(pretty.lines().map(|l| format!("  {l}")));
    }
    lines
}

impl PanelViewModel for MessageDetailViewModel {
    fn title(&self) -> String {
        self.message()
            .filter(|m| !m.topic.is_empty())
            .map_or_else(|| "Message Details".to_string(), |m| format!("Message: {}", m.topic))
    }

    fn display_rows(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.lines.iter().skip(state.scroll).cloned().collect()
    }

    fn selected_index(&self) -> Option<usize> {
        None
    }

    fn command_bindings(self: Arc<Self>) -> Vec<CommandBinding> {
        let up = Arc::clone(&self);
        let down = Arc::clone(&self);
        let mut bindings = movement_bindings(move || up.scroll_up(), move || down.scroll_down());

        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::PageUp),
            "Page Up",
            Command::new(move || vm.scroll_by(-SCROLL_PAGE)),
        ));
        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::PageDown),
            "Page Down",
            Command::new(move || vm.scroll_by(SCROLL_PAGE)),
        ));
        let close = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Char('q')),
            "Close",
            Command::new(move || close.close()),
        ));
        let close = self;
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Esc),
            "Close",
            Command::new(move || close.close()),
        ));
        bindings
    }

    fn set_on_change(&self, handler: ChangeHandler) {
        self.notifier.on_change(move |e| handler(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kafka_deck_core::types::Header;

    fn message(value: &str) -> Message {
        Message {
            topic: "orders".into(),
            partition: 1,
            offset: 42,
            key: String::new(),
            value: value.into(),
            headers: vec![Header::new("trace", "abc")],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn renders_sections_and_pretty_json() {
        let vm = MessageDetailViewModel::new();
        vm.set_message(Some(message(r#"{"id":1}"#)));
        let rows = vm.display_rows();
        assert!(rows.contains(&"  trace: abc".to_string()));
        assert!(rows.contains(&"  (null)".to_string()));
        assert!(rows.contains(&"    \"id\": 1".to_string()));
        assert_eq!(vm.title(), "Message: orders");
    }

    #[test]
    fn scrolling_is_clamped() {
        let vm = MessageDetailViewModel::new();
        vm.set_message(Some(message("plain")));
        vm.scroll_up().unwrap();
        assert_eq!(vm.scroll_position(), 0);
        for _ in 0..500 {
            vm.scroll_down().unwrap();
        }
        assert_eq!(vm.display_rows().len(), 1);
    }

    #[test]
    fn close_runs_hook() {
        let vm = MessageDetailViewModel::new();
        let closed = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let c = Arc::clone(&closed);
        vm.set_on_close(move || c.store(true, std::sync::atomic::Ordering::SeqCst));
        vm.close().unwrap();
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}

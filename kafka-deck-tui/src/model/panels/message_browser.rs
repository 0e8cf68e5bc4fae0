//! Message browser: records consumed from one topic

use std::sync::{Arc, PoisonError, RwLock};

use crossterm::event::KeyCode;
use kafka_deck_core::types::{Message, MessageFilter};
use kafka_deck_core::ClusterClient;
use unicode_width::UnicodeWidthChar;

use super::{movement_bindings, PanelViewModel};
use crate::error::{UiError, UiResult};
use crate::event::KeyBinding;
use crate::model::command::{Command, CommandBinding};
use crate::model::context::{ClientSlot, ViewContext};
use crate::model::list::{DisplayRow, ListViewModel};
use crate::model::notifier::{ChangeField, ChangeHandler};

/// Display columns of the value preview
const VALUE_PREVIEW_WIDTH: usize = 30;

/// Cut `s` to at most `width` terminal columns, marking the cut with `...`.
pub(crate) fn truncate_to_width(s: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            out.push_str("...");
            return out;
        }
        used += w;
        out.push(ch);
    }
    out
}

impl DisplayRow for Message {
    fn display_row(&self) -> String {
        let value = truncate_to_width(&self.value.replace('\n', " "), VALUE_PREVIEW_WIDTH);
        format!(
            "P:{} O:{} | K:{} | V:{} | {}",
            self.partition,
            self.offset,
            self.key,
            value,
            self.timestamp.format("%H:%M:%S")
        )
    }
}

type MessageSelected = Arc<dyn Fn(&Message) + Send + Sync>;

struct BrowserState {
    topic: Option<String>,
    filter: MessageFilter,
}

pub struct MessageBrowserViewModel {
    pub(crate) list: ListViewModel<Message>,
    state: RwLock<BrowserState>,
    on_message_selected: RwLock<Option<MessageSelected>>,
    client: ClientSlot,
    ctx: ViewContext,
}

impl MessageBrowserViewModel {
    /// `limit` caps how many records one load fetches.
    pub fn new(ctx: ViewContext, limit: usize) -> Self {
        Self {
            list: ListViewModel::new(),
            state: RwLock::new(BrowserState {
                topic: None,
                filter: MessageFilter {
                    limit,
                    ..MessageFilter::default()
                },
            }),
            on_message_selected: RwLock::new(None),
            client: ClientSlot::default(),
            ctx,
        }
    }

    pub fn set_client(&self, client: Option<Arc<dyn ClusterClient>>) {
        self.client.set(client);
    }

    pub fn set_on_message_selected<F>(&self, callback: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        *self
            .on_message_selected
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    pub fn topic(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .topic
            .clone()
    }

    pub fn filter(&self) -> MessageFilter {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .filter
            .clone()
    }

    /// Switch to `topic`, clearing rows from the previous one.
    pub fn set_topic(&self, topic: Option<String>) {
        let changed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let changed = state.topic != topic;
            state.topic = topic;
            changed
        };
        if changed {
            self.list.load(Vec::new());
        } else {
            self.list.notify(ChangeField::Items);
        }
    }

    /// Consume with `filter` and replace the rows when the fetch completes.
    pub fn load_messages(self: &Arc<Self>, filter: MessageFilter) -> UiResult<()> {
        let topic = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.filter = filter.clone();
            state.topic.clone()
        };
        let topic = topic.ok_or(UiError::NoSelection)?;
        let client = self.client.get().ok_or(UiError::NoActiveConnection)?;

        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match client.consume_messages(&topic, &filter).await {
                Ok(messages) => {
                    tracing::debug!(topic = %topic, count = messages.len(), "messages consumed");
                    let vm = Arc::clone(&this);
                    this.ctx.scheduler.update(move || {
                        if vm.topic().as_deref() == Some(topic.as_str()) && vm.client.holds(&client) {
                            vm.list.load(messages);
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to load messages", e.into()),
            }
        });
        Ok(())
    }

    pub fn refresh(self: &Arc<Self>) -> UiResult<()> {
        let filter = self.filter();
        self.load_messages(filter)
    }

    /// Hand the selected message to the detail view.
    pub fn select_message(&self) -> UiResult<()> {
        let message = self.list.selected().ok_or(UiError::NoSelection)?;
        let callback = self
            .on_message_selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(&message);
        }
        Ok(())
    }
}

impl PanelViewModel for MessageBrowserViewModel {
    fn title(&self) -> String {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &state.topic {
            None => "Messages".to_string(),
            Some(topic) => format!(
                "{topic} [P:{} L:{}]",
                state.filter.partition.unwrap_or(-1),
                state.filter.limit
            ),
        }
    }

    fn display_rows(&self) -> Vec<String> {
        self.list.display_rows()
    }

    fn selected_index(&self) -> Option<usize> {
        self.list.selected_index()
    }

    fn command_bindings(self: Arc<Self>) -> Vec<CommandBinding> {
        let up = Arc::clone(&self);
        let down = Arc::clone(&self);
        let mut bindings = movement_bindings(move || up.list.move_up(), move || down.list.move_down());

        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Char('r')),
            "Refresh",
            Command::new(move || vm.refresh()),
        ));
        let vm = self;
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Enter),
            "Open",
            Command::new(move || vm.select_message()),
        ));
        bindings
    }

    fn set_on_change(&self, handler: ChangeHandler) {
        self.list.set_on_change(move |e| handler(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("short", 30), "short");
        assert_eq!(truncate_to_width("abcdef", 3), "abc...");
        // each CJK character is two columns wide
        assert_eq!(truncate_to_width("日本語", 4), "日本...");
    }
}

//! Topics panel

use std::sync::Arc;

use crossterm::event::KeyCode;
use kafka_deck_core::types::Topic;
use kafka_deck_core::ClusterClient;

use super::{movement_bindings, PanelViewModel};
use crate::error::{UiError, UiResult};
use crate::event::KeyBinding;
use crate::model::command::{Command, CommandBinding};
use crate::model::context::{ClientSlot, ViewContext};
use crate::model::list::{DisplayRow, ListViewModel};
use crate::model::notifier::ChangeHandler;

impl DisplayRow for Topic {
    fn display_row(&self) -> String {
        if self.is_internal {
            format!("{} (internal)", self.name)
        } else {
            self.name.clone()
        }
    }
}

pub struct TopicsViewModel {
    pub(crate) list: ListViewModel<Topic>,
    client: ClientSlot,
    ctx: ViewContext,
}

impl TopicsViewModel {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            list: ListViewModel::new(),
            client: ClientSlot::default(),
            ctx,
        }
    }

    pub fn set_client(&self, client: Option<Arc<dyn ClusterClient>>) {
        self.client.set(client);
    }

    pub fn load(&self, topics: Vec<Topic>) {
        self.list.load(topics);
    }

    pub fn selected_topic(&self) -> Option<Topic> {
        self.list.selected()
    }

    pub fn set_on_selection_changed<F>(&self, callback: F)
    where
        F: Fn(&Topic) + Send + Sync + 'static,
    {
        self.list.set_on_selection_changed(callback);
    }

    /// Remove a deleted topic and keep the selection in range.
    pub fn delete_topic(&self, name: &str) -> bool {
        self.list.remove_where(|t| t.name == name) > 0
    }

    /// Re-list topics through the injected client.
    ///
    /// The result is dropped if the client was replaced while the request was in flight.
    pub fn reload(self: &Arc<Self>) -> UiResult<()> {
        let client = self.client.get().ok_or(UiError::NoActiveConnection)?;
        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match client.list_topics().await {
                Ok(topics) => {
                    let vm = Arc::clone(&this);
                    this.ctx.scheduler.update(move || {
                        if vm.client.holds(&client) {
                            vm.load(topics);
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to reload topics", e.into()),
            }
        });
        Ok(())
    }
}

impl PanelViewModel for TopicsViewModel {
    fn title(&self) -> String {
        format!("Topics ({})", self.list.len())
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
            KeyBinding::key(KeyCode::Char('g')),
            "Top",
            Command::new(move || vm.list.jump_to_top()),
        ));
        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::shift(KeyCode::Char('G')),
            "Bottom",
            Command::new(move || vm.list.jump_to_bottom()),
        ));
        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::ctrl(KeyCode::Char('d')),
            "Page Down",
            Command::new(move || vm.list.page_down()),
        ));
        let vm = Arc::clone(&self);
        bindings.push(CommandBinding::new(
            KeyBinding::ctrl(KeyCode::Char('u')),
            "Page Up",
            Command::new(move || vm.list.page_up()),
        ));
        let vm = self;
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Char('r')),
            "Reload",
            Command::new(move || vm.reload()),
        ));
        bindings
    }

    fn set_on_change(&self, handler: ChangeHandler) {
        self.list.set_on_change(move |e| handler(e));
    }
}

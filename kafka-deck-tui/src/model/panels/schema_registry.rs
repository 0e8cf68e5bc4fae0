//! Schema registry panel

use std::sync::Arc;

use kafka_deck_core::types::SchemaEntry;

use super::{movement_bindings, PanelViewModel};
use crate::model::command::CommandBinding;
use crate::model::list::{DisplayRow, ListViewModel};
use crate::model::notifier::ChangeHandler;

impl DisplayRow for SchemaEntry {
    fn display_row(&self) -> String {
        format!("{} (v{})", self.subject, self.version)
    }
}

#[derive(Default)]
pub struct SchemaRegistryViewModel {
    pub(crate) list: ListViewModel<SchemaEntry>,
}

impl SchemaRegistryViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, entries: Vec<SchemaEntry>) {
        self.list.load(entries);
    }

    pub fn set_on_selection_changed<F>(&self, callback: F)
    where
        F: Fn(&SchemaEntry) + Send + Sync + 'static,
    {
        self.list.set_on_selection_changed(callback);
    }
}

impl PanelViewModel for SchemaRegistryViewModel {
    fn title(&self) -> String {
        "Schema Registry".to_string()
    }

    fn display_rows(&self) -> Vec<String> {
        self.list.display_rows()
    }

    fn selected_index(&self) -> Option<usize> {
        self.list.selected_index()
    }

    fn command_bindings(self: Arc<Self>) -> Vec<CommandBinding> {
        let up = Arc::clone(&self);
        let down = self;
        movement_bindings(move || up.list.move_up(), move || down.list.move_down())
    }

    fn set_on_change(&self, handler: ChangeHandler) {
        self.list.set_on_change(move |e| handler(e));
    }
}

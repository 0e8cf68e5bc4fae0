//! Brokers panel

use std::sync::{Arc, PoisonError, RwLock};

use crossterm::event::KeyCode;
use kafka_deck_core::types::{Broker, BrokerProfile};

use super::{movement_bindings, PanelViewModel};
use crate::error::UiResult;
use crate::event::KeyBinding;
use crate::model::command::{Command, CommandBinding};
use crate::model::list::{DisplayRow, ListViewModel};
use crate::model::notifier::ChangeHandler;

impl DisplayRow for Broker {
    fn display_row(&self) -> String {
        format!("{} ({})", self.name, self.address)
    }
}

type EditRequest = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct BrokersViewModel {
    pub(crate) list: ListViewModel<Broker>,
    /// Asks the app to open the profile file in an external editor
    on_edit_requested: RwLock<Option<EditRequest>>,
}

impl BrokersViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, brokers: Vec<Broker>) {
        self.list.load(brokers);
    }

    /// Append a row for a newly added profile.
    pub fn add_broker(&self, profile: &BrokerProfile) {
        self.list.push(profile.to_broker(self.list.len()));
    }

    pub fn set_on_selection_changed<F>(&self, callback: F)
    where
        F: Fn(&Broker) + Send + Sync + 'static,
    {
        self.list.set_on_selection_changed(callback);
    }

    pub fn set_on_edit_requested<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self
            .on_edit_requested
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    fn request_edit(&self) -> UiResult<()> {
        let callback = self
            .on_edit_requested
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }
}

impl PanelViewModel for BrokersViewModel {
    fn title(&self) -> String {
        "Brokers".to_string()
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
        bindings.push(CommandBinding::new(
            KeyBinding::key(KeyCode::Char('e')),
            "Edit",
            Command::new(move || self.request_edit()),
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
    fn rows_show_name_and_address() {
        let vm = BrokersViewModel::new();
        vm.add_broker(&BrokerProfile::new("local", "localhost:9092"));
        assert_eq!(vm.display_rows(), vec!["local (localhost:9092)".to_string()]);
        // push does not select
        assert_eq!(vm.selected_index(), None);
    }

    #[test]
    fn bindings_move_selection() {
        let vm = Arc::new(BrokersViewModel::new());
        vm.load(vec![
            BrokerProfile::new("a", "a:1").to_broker(0),
            BrokerProfile::new("b", "b:1").to_broker(1),
        ]);
        let bindings = Arc::clone(&vm).command_bindings();
        let down = bindings.iter().find(|b| b.name == "Down").unwrap();
        down.command.execute().unwrap();
        assert_eq!(vm.list.selected().unwrap().name, "b");
        assert!(down.command.execute().is_err());
    }

    #[test]
    fn edit_binding_fires_callback() {
        let vm = Arc::new(BrokersViewModel::new());
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        vm.set_on_edit_requested(move || {
            h.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        let bindings = Arc::clone(&vm).command_bindings();
        let edit = bindings.iter().find(|b| b.name == "Edit").unwrap();
        edit.command.execute().unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}

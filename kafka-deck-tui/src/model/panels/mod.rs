//! Per-panel view models
//!
//! List panels wrap a [`ListViewModel`](crate::model::list::ListViewModel); detail panels hold
//! the selected item of their upstream list plus whatever they load for it. Every panel
//! exposes the same surface to the render driver through [`PanelViewModel`].

mod brokers;
mod consumer_group_detail;
mod consumer_groups;
mod message_browser;
mod message_detail;
mod schema_registry;
mod schema_registry_detail;
mod topic_detail;
mod topics;

use std::sync::Arc;

pub use brokers::BrokersViewModel;
pub use consumer_group_detail::ConsumerGroupDetailViewModel;
pub use consumer_groups::ConsumerGroupsViewModel;
pub use message_browser::MessageBrowserViewModel;
pub use message_detail::MessageDetailViewModel;
pub use schema_registry::SchemaRegistryViewModel;
pub use schema_registry_detail::SchemaRegistryDetailViewModel;
pub use topic_detail::TopicDetailViewModel;
pub use topics::TopicsViewModel;

use crate::model::command::{Command, CommandBinding};
use crate::model::notifier::ChangeHandler;
use crate::event::KeyBinding;
use crossterm::event::KeyCode;

/// Render-driver contract of a panel
pub trait PanelViewModel: Send + Sync {
    fn title(&self) -> String;

    fn display_rows(&self) -> Vec<String>;

    /// `None` when nothing is selected or the panel is not a list
    fn selected_index(&self) -> Option<usize>;

    /// Bindings capture the view model, so they are built from an `Arc`.
    fn command_bindings(self: Arc<Self>) -> Vec<CommandBinding>;

    fn set_on_change(&self, handler: ChangeHandler);
}

/// `k`/`j`/`↑`/`↓` bindings shared by list panels.
pub(crate) fn movement_bindings<F, G>(up: F, down: G) -> Vec<CommandBinding>
where
    F: Fn() -> crate::error::UiResult<()> + Clone + Send + Sync + 'static,
    G: Fn() -> crate::error::UiResult<()> + Clone + Send + Sync + 'static,
{
    vec![
        CommandBinding::new(KeyBinding::key(KeyCode::Char('k')), "Up", Command::new(up.clone())),
        CommandBinding::new(KeyBinding::key(KeyCode::Up), "Up", Command::new(up)),
        CommandBinding::new(KeyBinding::key(KeyCode::Char('j')), "Down", Command::new(down.clone())),
        CommandBinding::new(KeyBinding::key(KeyCode::Down), "Down", Command::new(down)),
    ]
}

//! Model layer
//!
//! View models own everything the screen shows. List panels keep rows and a selection
//! behind a per-panel lock and notify on every change; detail panels follow the
//! selection of their list. [`MainViewModel`] wires the cascade between them and owns
//! the cluster handle, [`PopupManager`](popup::PopupManager) owns the single modal slot, and [`App`] is the
//! UI-thread state the update layer mutates.

mod app;
pub mod command;
pub mod context;
mod focus;
pub mod list;
pub mod main_view_model;
pub mod notifier;
pub mod panels;
pub mod popup;
pub mod wizard;

pub use app::{App, MessageView};
pub use focus::PanelId;
pub use main_view_model::{MainViewModel, Services};

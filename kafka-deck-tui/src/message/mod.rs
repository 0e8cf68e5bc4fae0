//! Message layer
//!
//! Everything that changes the [`App`](crate::model::App) is expressed as a message:
//! key presses translated by the event layer and results posted by background tasks
//! through the [`UiScheduler`](crate::event::UiScheduler). The update layer consumes them.

mod app;
mod content;
mod modal;
mod navigation;

pub use app::AppMessage;
pub use content::ContentMessage;
pub use modal::ModalMessage;
pub use navigation::NavigationMessage;

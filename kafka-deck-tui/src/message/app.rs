use kafka_deck_core::types::TopicConfig;

use super::{ContentMessage, ModalMessage, NavigationMessage};

#[derive(Debug, Clone)]
pub enum AppMessage {
    Quit,

    Navigation(NavigationMessage),

    Content(ContentMessage),

    Modal(ModalMessage),

    /// Hand the terminal to `$EDITOR` for the broker profile file
    EditProfiles,

    /// Config fetched for the topic config editor
    TopicConfigLoaded(TopicConfig),

    /// Status line notice
    Status(String),

    /// Error surfaced on the status line
    ReportError(String),

    /// Nothing changed but the screen must be repainted (resize)
    Redraw,

    Noop,
}

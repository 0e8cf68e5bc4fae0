use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum ContentMessage {
    /// Key for the focused panel's command bindings
    PanelKey(KeyEvent),
    /// Add a broker or topic, depending on focus
    New,
    Delete,
    Produce,
    EditConfig,
    BrowseMessages,
    /// Cycle the topic detail tab
    NextTab,
    ShowMessageDetail,
    CloseMessageDetail,
    /// Leave the message views entirely
    CloseMessages,
}

use crate::model::PanelId;

#[derive(Debug, Clone)]
pub enum NavigationMessage {
    FocusNext,
    FocusPrev,
    FocusPanel(PanelId),
}

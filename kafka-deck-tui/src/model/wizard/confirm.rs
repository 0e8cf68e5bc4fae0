/// What a confirmed dialog goes on to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTopic(String),
}

/// Yes/no prompt
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

impl ConfirmDialog {
    pub fn new(message: impl Into<String>, action: ConfirmAction) -> Self {
        let title = match &action {
            ConfirmAction::DeleteTopic(_) => "Delete Topic",
        };
        Self {
            title: title.to_string(),
            message: message.into(),
            action,
        }
    }
}

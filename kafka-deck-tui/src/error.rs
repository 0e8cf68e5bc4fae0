//! UI layer error type

use std::sync::Arc;

use kafka_deck_core::CoreError;
use thiserror::Error;

use crate::model::wizard::ValidationErrors;

#[derive(Error, Debug, Clone)]
pub enum UiError {
    /// Movement or action had nothing to act on
    #[error("no item selected")]
    NoSelection,

    #[error("no active kafka client")]
    NoActiveConnection,

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl UiError {
    /// Errors the dispatcher drops without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NoSelection)
    }

    /// Same classification as [`CoreError::is_expected`]: `warn` when true, `error` otherwise.
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NoSelection | Self::NoActiveConnection | Self::Validation(_) => true,
            Self::Core(e) => e.is_expected(),
        }
    }

    /// Log once with the level matching [`Self::is_expected`].
    pub fn log(&self, context: &str) {
        if self.is_expected() {
            tracing::warn!(error = %self, "{context}");
        } else {
            tracing::error!(error = %self, "{context}");
        }
    }
}

impl From<ValidationErrors> for UiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type UiResult<T> = Result<T, UiError>;

/// Process-wide error sink. Called from any thread; implementations marshal to the UI thread.
pub type ErrorSink = Arc<dyn Fn(UiError) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_no_selection_is_silent() {
        assert!(UiError::NoSelection.is_silent());
        assert!(!UiError::NoActiveConnection.is_silent());
        assert!(!UiError::Core(CoreError::Transport("x".into())).is_silent());
    }

    #[test]
    fn core_errors_keep_their_message() {
        let err: UiError = CoreError::TopicNotFound("orders".into()).into();
        assert_eq!(err.to_string(), "Topic not found: orders");
        assert!(err.is_expected());
    }
}

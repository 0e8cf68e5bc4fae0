//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Could not establish a session with the cluster
    #[error("Connection error: {broker} - {message}")]
    Connection { broker: String, message: String },

    /// A request on an established session failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Topic not found
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    /// Consumer group not found
    #[error("Consumer group not found: {0}")]
    ConsumerGroupNotFound(String),

    /// Broker profile not found
    #[error("Broker profile not found: {0}")]
    ProfileNotFound(String),

    /// No broker is connected
    #[error("no active kafka client")]
    NoActiveConnection,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Credential storage error
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::TopicNotFound(_)
            | Self::ConsumerGroupNotFound(_)
            | Self::ProfileNotFound(_)
            | Self::NoActiveConnection
            | Self::ValidationError(_) => true,
            Self::Connection { .. }
            | Self::Transport(_)
            | Self::StorageError(_)
            | Self::CredentialError(_)
            | Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_validation_are_expected() {
        assert!(CoreError::TopicNotFound("orders".into()).is_expected());
        assert!(CoreError::ValidationError("bad".into()).is_expected());
        assert!(CoreError::NoActiveConnection.is_expected());
    }

    #[test]
    fn transport_failures_are_not_expected() {
        let err = CoreError::Connection {
            broker: "local".into(),
            message: "refused".into(),
        };
        assert!(!err.is_expected());
        assert!(!CoreError::Transport("timeout".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::TopicNotFound("orders".into())).unwrap();
        assert_eq!(json["code"], "TopicNotFound");
        assert_eq!(json["details"], "orders");
    }
}

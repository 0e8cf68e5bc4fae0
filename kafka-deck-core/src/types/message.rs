//! Record types for producing and browsing messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: String,
    pub value: String,
    pub headers: Vec<Header>,
    pub timestamp: DateTime<Utc>,
}

/// Where consumption starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartOffset {
    Earliest,
    #[default]
    Latest,
    At(i64),
}

/// How message values are rendered in the detail pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageFormat {
    #[default]
    Json,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFilter {
    /// `None` reads every partition
    pub partition: Option<i32>,
    pub offset: StartOffset,
    pub limit: usize,
    pub format: MessageFormat,
}

impl MessageFilter {
    pub const DEFAULT_LIMIT: usize = 100;
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            partition: None,
            offset: StartOffset::Latest,
            limit: Self::DEFAULT_LIMIT,
            format: MessageFormat::Json,
        }
    }
}

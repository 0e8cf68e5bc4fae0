//! Schema registry types

use serde::{Deserialize, Serialize};

/// Latest version of a registered subject
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub subject: String,
    pub version: i32,
    /// `AVRO`, `JSON` or `PROTOBUF`
    pub schema_type: String,
    pub schema: String,
}

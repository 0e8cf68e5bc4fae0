//! Consumer group types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumerGroup {
    pub name: String,
    /// Group coordinator state, e.g. `Stable` or `Rebalancing`
    pub state: String,
    pub members: usize,
}

/// Committed offset and lag of a group on one partition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumerGroupOffset {
    pub topic: String,
    pub partition: i32,
    pub lag: i64,
    pub offset: i64,
}

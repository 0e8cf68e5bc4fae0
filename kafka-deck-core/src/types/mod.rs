//! Domain type definitions

mod broker;
mod consumer_group;
mod message;
mod schema;
mod topic;

pub use broker::{AuthType, Broker, BrokerProfile, SaslMechanism};
pub use consumer_group::{ConsumerGroup, ConsumerGroupOffset};
pub use message::{Header, Message, MessageFilter, MessageFormat, StartOffset};
pub use schema::SchemaEntry;
pub use topic::{parse_retention, CleanupPolicy, Partition, Topic, TopicConfig, MILLIS_PER_DAY};

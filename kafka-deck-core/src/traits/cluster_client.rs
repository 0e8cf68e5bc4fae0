//! Cluster client abstraction
//!
//! Everything that crosses the network goes through [`ClusterClient`]. Implementations own
//! their own timeouts; callers treat every method as a fallible call with no retry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    BrokerProfile, ConsumerGroup, ConsumerGroupOffset, Header, Message, MessageFilter, Partition,
    SchemaEntry, Topic, TopicConfig,
};

/// Live session against one cluster
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Open the session. Must be called before any other request.
    async fn connect(&self) -> CoreResult<()>;

    /// Release the session. Idempotent.
    fn close(&self);

    async fn list_topics(&self) -> CoreResult<Vec<Topic>>;

    async fn get_topic_partitions(&self, topic: &str) -> CoreResult<Vec<Partition>>;

    async fn create_topic(&self, config: &TopicConfig) -> CoreResult<()>;

    async fn delete_topic(&self, topic: &str) -> CoreResult<()>;

    async fn get_topic_config(&self, topic: &str) -> CoreResult<TopicConfig>;

    async fn update_topic_config(&self, config: &TopicConfig) -> CoreResult<()>;

    async fn produce_message(
        &self,
        topic: &str,
        key: &str,
        value: &str,
        headers: &[Header],
    ) -> CoreResult<()>;

    async fn consume_messages(&self, topic: &str, filter: &MessageFilter)
        -> CoreResult<Vec<Message>>;

    async fn list_consumer_groups(&self) -> CoreResult<Vec<ConsumerGroup>>;

    async fn list_consumer_group_offsets(&self, group: &str) -> CoreResult<Vec<ConsumerGroupOffset>>;

    async fn list_schema_entries(&self) -> CoreResult<Vec<SchemaEntry>>;
}

/// Builds an unconnected [`ClusterClient`] for a profile
pub trait ClientFactory: Send + Sync {
    fn new_client(&self, profile: &BrokerProfile) -> CoreResult<Arc<dyn ClusterClient>>;
}

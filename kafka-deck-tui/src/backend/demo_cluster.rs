//! In-memory demo cluster
//!
//! Lets the dashboard run without a live broker. Every broker profile gets its own
//! cluster, seeded with sample topics, consumer groups and schemas; the cluster
//! outlives the clients so switching away and back keeps created topics and produced
//! messages.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use kafka_deck_core::traits::{ClientFactory, ClusterClient};
use kafka_deck_core::types::{
    BrokerProfile, CleanupPolicy, ConsumerGroup, ConsumerGroupOffset, Header, Message,
    MessageFilter, Partition, SchemaEntry, StartOffset, Topic, TopicConfig, MILLIS_PER_DAY,
};
use kafka_deck_core::{CoreError, CoreResult};

const BROKER_IDS: [i32; 3] = [0, 1, 2];

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== Cluster state =====

struct DemoTopic {
    config: TopicConfig,
    /// Next offset per partition
    end_offsets: Vec<i64>,
    /// Retained records, append order
    records: Vec<Message>,
    round_robin: usize,
}

impl DemoTopic {
    fn new(config: TopicConfig) -> Self {
        let partitions = usize::try_from(config.partitions).unwrap_or(1).max(1);
        Self {
            config,
            end_offsets: vec![0; partitions],
            records: Vec::new(),
            round_robin: 0,
        }
    }

    fn partition_count(&self) -> usize {
        self.end_offsets.len()
    }

    fn row(&self) -> Topic {
        let replicas = usize::try_from(self.config.replication_factor).unwrap_or(0);
        Topic {
            name: self.config.name.clone(),
            partitions: self.partition_count(),
            replicas,
            in_sync_replicas: replicas,
            urp: 0,
            cleanup_policy: self.config.cleanup_policy,
            message_count: self.end_offsets.iter().sum(),
            is_internal: self.config.name.starts_with("__"),
        }
    }

    fn partitions(&self) -> Vec<Partition> {
        let replicas: Vec<i32> = BROKER_IDS
            .iter()
            .copied()
            .take(usize::try_from(self.config.replication_factor).unwrap_or(1))
            .collect();
        (0..)
            .zip(&self.end_offsets)
            .map(|(id, &end)| Partition {
                id,
                message_count: end,
                start_offset: 0,
                end_offset: end,
                leader: id % 3,
                replicas: replicas.clone(),
                in_sync_replicas: replicas.clone(),
            })
            .collect()
    }

    /// Keyed records stick to one partition; unkeyed ones rotate.
    fn pick_partition(&mut self, key: &str) -> usize {
        let n = self.partition_count();
        if key.is_empty() {
            self.round_robin = (self.round_robin + 1) % n;
            self.round_robin
        } else {
            key.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b.into())) % n
        }
    }

    fn append(&mut self, key: &str, value: &str, headers: &[Header]) {
        let slot = self.pick_partition(key);
        let offset = self.end_offsets[slot];
        self.end_offsets[slot] += 1;
        self.records.push(Message {
            topic: self.config.name.clone(),
            partition: i32::try_from(slot).unwrap_or(i32::MAX),
            offset,
            key: key.to_string(),
            value: value.to_string(),
            headers: headers.to_vec(),
            timestamp: Utc::now(),
        });
    }

    fn read(&self, filter: &MessageFilter) -> Vec<Message> {
        let matching: Vec<&Message> = self
            .records
            .iter()
            .filter(|m| filter.partition.is_none_or(|p| m.partition == p))
            .filter(|m| match filter.offset {
                StartOffset::At(from) => m.offset >= from,
                StartOffset::Earliest | StartOffset::Latest => true,
            })
            .collect();

        let skip = match filter.offset {
            StartOffset::Latest => matching.len().saturating_sub(filter.limit),
            StartOffset::Earliest | StartOffset::At(_) => 0,
        };
        matching
            .into_iter()
            .skip(skip)
            .take(filter.limit)
            .cloned()
            .collect()
    }
}

struct DemoCluster {
    topics: BTreeMap<String, DemoTopic>,
    groups: Vec<ConsumerGroup>,
    schemas: Vec<SchemaEntry>,
}

impl DemoCluster {
    fn seeded() -> Self {
        let mut topics = BTreeMap::new();
        for (name, partitions, replicas) in [
            ("orders", 6, 3),
            ("payments", 3, 3),
            ("users", 12, 3),
            ("notifications", 6, 2),
            ("analytics-events", 24, 3),
        ] {
            let mut topic = DemoTopic::new(TopicConfig {
                name: name.to_string(),
                partitions,
                replication_factor: replicas,
                cleanup_policy: CleanupPolicy::Delete,
                min_in_sync_replicas: 1,
                retention_ms: 7 * MILLIS_PER_DAY,
            });
            seed_records(&mut topic);
            topics.insert(name.to_string(), topic);
        }

        let group = |name: &str, state: &str, members| ConsumerGroup {
            name: name.to_string(),
            state: state.to_string(),
            members,
        };

        Self {
            topics,
            groups: vec![
                group("order-processor", "Stable", 3),
                group("payment-handler", "Stable", 2),
                group("notification-sender", "Rebalancing", 4),
                group("analytics-consumer", "Stable", 6),
            ],
            schemas: seed_schemas(),
        }
    }

    fn topic(&self, name: &str) -> CoreResult<&DemoTopic> {
        self.topics
            .get(name)
            .ok_or_else(|| CoreError::TopicNotFound(name.to_string()))
    }

    fn topic_mut(&mut self, name: &str) -> CoreResult<&mut DemoTopic> {
        self.topics
            .get_mut(name)
            .ok_or_else(|| CoreError::TopicNotFound(name.to_string()))
    }

    /// Committed position of `group`, trailing the log end by a small lag.
    fn offsets(&self, group: &str) -> CoreResult<Vec<ConsumerGroupOffset>> {
        if !self.groups.iter().any(|g| g.name == group) {
            return Err(CoreError::ConsumerGroupNotFound(group.to_string()));
        }

        let mut rows = Vec::new();
        for (topic, lags) in [("orders", &[0, 10, 5][..]), ("payments", &[0][..])] {
            let Some(t) = self.topics.get(topic) else {
                continue;
            };
            for ((partition, &end), &lag) in (0..).zip(&t.end_offsets).zip(lags) {
                let lag = lag.min(end);
                rows.push(ConsumerGroupOffset {
                    topic: topic.to_string(),
                    partition,
                    lag,
                    offset: end - lag,
                });
            }
        }
        Ok(rows)
    }
}

fn seed_records(topic: &mut DemoTopic) {
    let name = topic.config.name.clone();
    for i in 1..=12 {
        let key = format!("{name}-{i}");
        let value = match name.as_str() {
            "orders" => format!(r#"{{"id":"o-{i}","amount":{},"status":"created"}}"#, i * 25),
            "payments" => format!(r#"{{"id":"p-{i}","orderId":"o-{i}","amount":{}.5}}"#, i * 25),
            "users" => format!(r#"{{"id":"u-{i}","name":"user {i}","email":"user{i}@example.com"}}"#),
            _ => format!("event {i}"),
        };
        let headers = [Header::new("source", "demo")];
        topic.append(&key, &value, &headers);
    }
}

fn seed_schemas() -> Vec<SchemaEntry> {
    let entry = |subject: &str, version, schema_type: &str, schema: &str| SchemaEntry {
        subject: subject.to_string(),
        version,
        schema_type: schema_type.to_string(),
        schema: schema.to_string(),
    };
    vec![
        entry(
            "orders-value",
            3,
            "AVRO",
            r#"{
  "type": "record",
  "name": "Order",
  "namespace": "com.example.orders",
  "fields": [
    { "name": "id", "type": "string" },
    { "name": "amount", "type": { "type": "int", "connect.default": 0 }, "default": 0 },
    { "name": "status", "type": "string" }
  ]
}"#,
        ),
        entry(
            "payments-value",
            2,
            "AVRO",
            r#"{
  "type": "record",
  "name": "Payment",
  "namespace": "com.example.payments",
  "fields": [
    { "name": "id", "type": "string" },
    { "name": "orderId", "type": "string" },
    { "name": "amount", "type": "double" }
  ]
}"#,
        ),
        entry(
            "users-value",
            5,
            "JSON",
            r#"{
  "type": "object",
  "properties": {
    "id": {"type": "string"},
    "name": {"type": "string"},
    "email": {"type": "string"}
  },
  "required": ["id", "name"]
}"#,
        ),
    ]
}

// ===== Client =====

/// Session against one demo cluster
pub struct DemoClusterClient {
    broker: String,
    cluster: Arc<Mutex<DemoCluster>>,
    latency: Duration,
    reachable: bool,
    connected: AtomicBool,
}

impl DemoClusterClient {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) -> CoreResult<MutexGuard<'_, DemoCluster>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.is_connected() {
            return Err(CoreError::Transport(format!(
                "client for '{}' is not connected",
                self.broker
            )));
        }
        Ok(lock(&self.cluster))
    }
}

#[async_trait]
impl ClusterClient for DemoClusterClient {
    async fn connect(&self) -> CoreResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.reachable {
            return Err(CoreError::Connection {
                broker: self.broker.clone(),
                message: "no broker transport available".to_string(),
            });
        }
        self.connected.store(true, Ordering::SeqCst);
        tracing::debug!(broker = %self.broker, "Demo client connected");
        Ok(())
    }

    fn close(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::debug!(broker = %self.broker, "Demo client closed");
        }
    }

    async fn list_topics(&self) -> CoreResult<Vec<Topic>> {
        let cluster = self.round_trip().await?;
        Ok(cluster.topics.values().map(DemoTopic::row).collect())
    }

    async fn get_topic_partitions(&self, topic: &str) -> CoreResult<Vec<Partition>> {
        Ok(self.round_trip().await?.topic(topic)?.partitions())
    }

    async fn create_topic(&self, config: &TopicConfig) -> CoreResult<()> {
        let mut cluster = self.round_trip().await?;
        if cluster.topics.contains_key(&config.name) {
            return Err(CoreError::ValidationError(format!(
                "topic '{}' already exists",
                config.name
            )));
        }
        if config.replication_factor > 3 {
            return Err(CoreError::ValidationError(format!(
                "replication factor {} larger than available brokers (3)",
                config.replication_factor
            )));
        }
        cluster
            .topics
            .insert(config.name.clone(), DemoTopic::new(config.clone()));
        Ok(())
    }

    async fn delete_topic(&self, topic: &str) -> CoreResult<()> {
        self.round_trip()
            .await?
            .topics
            .remove(topic)
            .map(drop)
            .ok_or_else(|| CoreError::TopicNotFound(topic.to_string()))
    }

    async fn get_topic_config(&self, topic: &str) -> CoreResult<TopicConfig> {
        let cluster = self.round_trip().await?;
        let t = cluster.topic(topic)?;
        let mut config = t.config.clone();
        config.partitions = i32::try_from(t.partition_count()).unwrap_or(i32::MAX);
        Ok(config)
    }

    async fn update_topic_config(&self, config: &TopicConfig) -> CoreResult<()> {
        let mut cluster = self.round_trip().await?;
        let topic = cluster.topic_mut(&config.name)?;

        let wanted = usize::try_from(config.partitions).unwrap_or(0);
        if wanted < topic.partition_count() {
            return Err(CoreError::ValidationError(format!(
                "partition count can only be increased (currently {})",
                topic.partition_count()
            )));
        }
        topic.end_offsets.resize(wanted, 0);
        topic.config = config.clone();
        Ok(())
    }

    async fn produce_message(
        &self,
        topic: &str,
        key: &str,
        value: &str,
        headers: &[Header],
    ) -> CoreResult<()> {
        self.round_trip()
            .await?
            .topic_mut(topic)?
            .append(key, value, headers);
        Ok(())
    }

    async fn consume_messages(
        &self,
        topic: &str,
        filter: &MessageFilter,
    ) -> CoreResult<Vec<Message>> {
        Ok(self.round_trip().await?.topic(topic)?.read(filter))
    }

    async fn list_consumer_groups(&self) -> CoreResult<Vec<ConsumerGroup>> {
        Ok(self.round_trip().await?.groups.clone())
    }

    async fn list_consumer_group_offsets(&self, group: &str) -> CoreResult<Vec<ConsumerGroupOffset>> {
        self.round_trip().await?.offsets(group)
    }

    async fn list_schema_entries(&self) -> CoreResult<Vec<SchemaEntry>> {
        Ok(self.round_trip().await?.schemas.clone())
    }
}

// ===== Factory =====

/// Hands out [`DemoClusterClient`]s, one persistent cluster per profile name
pub struct DemoClientFactory {
    clusters: Mutex<HashMap<String, Arc<Mutex<DemoCluster>>>>,
    latency: Duration,
    reachable: bool,
}

impl DemoClientFactory {
    pub fn new() -> Self {
        Self {
            clusters: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            reachable: true,
        }
    }

    /// Clients whose `connect` always fails, for running without the demo data.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// Delay every request by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for DemoClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for DemoClientFactory {
    fn new_client(&self, profile: &BrokerProfile) -> CoreResult<Arc<dyn ClusterClient>> {
        if profile.bootstrap_servers.trim().is_empty() {
            return Err(CoreError::Connection {
                broker: profile.name.clone(),
                message: "no bootstrap servers configured".to_string(),
            });
        }

        let cluster = Arc::clone(
            lock(&self.clusters)
                .entry(profile.name.clone())
                .or_insert_with(|| Arc::new(Mutex::new(DemoCluster::seeded()))),
        );

        Ok(Arc::new(DemoClusterClient {
            broker: profile.name.clone(),
            cluster,
            latency: self.latency,
            reachable: self.reachable,
            connected: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> BrokerProfile {
        BrokerProfile::new(name, "localhost:9092")
    }

    async fn connected(factory: &DemoClientFactory, name: &str) -> Arc<dyn ClusterClient> {
        let client = factory.new_client(&profile(name)).unwrap();
        client.connect().await.unwrap();
        client
    }

    #[tokio::test]
    async fn seeded_cluster_lists_sample_data() {
        let factory = DemoClientFactory::new();
        let client = connected(&factory, "local").await;

        let topics = client.list_topics().await.unwrap();
        let names: Vec<_> = topics.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"orders"));
        assert_eq!(topics.len(), 5);

        assert_eq!(client.list_consumer_groups().await.unwrap().len(), 4);
        assert_eq!(client.list_schema_entries().await.unwrap().len(), 3);
        assert_eq!(client.get_topic_partitions("users").await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn requests_fail_before_connect_and_after_close() {
        let factory = DemoClientFactory::new();
        let client = factory.new_client(&profile("local")).unwrap();
        assert!(matches!(
            client.list_topics().await,
            Err(CoreError::Transport(_))
        ));

        client.connect().await.unwrap();
        client.close();
        client.close();
        assert!(client.list_topics().await.is_err());
    }

    #[tokio::test]
    async fn unreachable_factory_fails_connect() {
        let factory = DemoClientFactory::unreachable();
        let client = factory.new_client(&profile("prod")).unwrap();
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, CoreError::Connection { broker, .. } if broker == "prod"));
    }

    #[tokio::test]
    async fn create_delete_and_config_round_trip() {
        let factory = DemoClientFactory::new();
        let client = connected(&factory, "local").await;
        let config = TopicConfig {
            name: "audit".into(),
            partitions: 2,
            replication_factor: 1,
            cleanup_policy: CleanupPolicy::Compact,
            min_in_sync_replicas: 1,
            retention_ms: MILLIS_PER_DAY,
        };

        client.create_topic(&config).await.unwrap();
        assert!(client.create_topic(&config).await.is_err());
        assert_eq!(client.get_topic_config("audit").await.unwrap(), config);

        let grown = TopicConfig {
            partitions: 4,
            ..config.clone()
        };
        client.update_topic_config(&grown).await.unwrap();
        assert_eq!(client.get_topic_partitions("audit").await.unwrap().len(), 4);

        let shrunk = TopicConfig {
            partitions: 1,
            ..config
        };
        assert!(client.update_topic_config(&shrunk).await.is_err());

        client.delete_topic("audit").await.unwrap();
        assert!(matches!(
            client.delete_topic("audit").await,
            Err(CoreError::TopicNotFound(_))
        ));
    }

    #[tokio::test]
    async fn produced_messages_are_consumable_and_survive_reconnect() {
        let factory = DemoClientFactory::new();
        let client = connected(&factory, "local").await;
        client
            .produce_message("payments", "k1", "hello", &[Header::new("trace", "abc")])
            .await
            .unwrap();
        client.close();

        let again = connected(&factory, "local").await;
        let latest = again
            .consume_messages("payments", &MessageFilter::default())
            .await
            .unwrap();
        let last = latest.last().unwrap();
        assert_eq!(last.value, "hello");
        assert_eq!(last.headers, vec![Header::new("trace", "abc")]);
    }

    #[tokio::test]
    async fn consume_honours_partition_offset_and_limit() {
        let factory = DemoClientFactory::new();
        let client = connected(&factory, "local").await;

        let filter = MessageFilter {
            partition: Some(1),
            offset: StartOffset::Earliest,
            limit: 100,
            ..MessageFilter::default()
        };
        let rows = client.consume_messages("orders", &filter).await.unwrap();
        assert!(rows.iter().all(|m| m.partition == 1));

        let limited = MessageFilter {
            limit: 3,
            ..MessageFilter::default()
        };
        assert_eq!(client.consume_messages("orders", &limited).await.unwrap().len(), 3);

        let from = MessageFilter {
            partition: None,
            offset: StartOffset::At(1),
            limit: 100,
            ..MessageFilter::default()
        };
        let rows = client.consume_messages("orders", &from).await.unwrap();
        assert!(rows.iter().all(|m| m.offset >= 1));
    }

    #[tokio::test]
    async fn clusters_are_isolated_per_profile() {
        let factory = DemoClientFactory::new();
        let a = connected(&factory, "a").await;
        let b = connected(&factory, "b").await;
        a.delete_topic("orders").await.unwrap();
        assert!(b.get_topic_partitions("orders").await.is_ok());
    }

    #[tokio::test]
    async fn offsets_for_unknown_group_fail() {
        let factory = DemoClientFactory::new();
        let client = connected(&factory, "local").await;
        assert!(!client
            .list_consumer_group_offsets("order-processor")
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            client.list_consumer_group_offsets("nobody").await,
            Err(CoreError::ConsumerGroupNotFound(_))
        ));
    }
}

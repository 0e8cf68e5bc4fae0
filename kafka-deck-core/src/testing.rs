//! Test doubles
//!
//! Provides recording mocks for the collaborator traits. Every client created by a
//! [`RecordingClientFactory`] appends to one shared, ordered journal so tests can assert
//! the relative order of `connect` / `close` across clients.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::traits::{BrokerProfileRepository, ClientFactory, ClusterClient, CredentialStore, Credentials};
use crate::types::{
    BrokerProfile, ConsumerGroup, ConsumerGroupOffset, Header, Message, MessageFilter, Partition,
    SchemaEntry, Topic, TopicConfig,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== Journal =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Created(String),
    Connected(String),
    Closed(String),
    Call { broker: String, op: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<ClientEvent>>>);

impl Journal {
    fn push(&self, event: ClientEvent) {
        lock(&self.0).push(event);
    }

    pub fn events(&self) -> Vec<ClientEvent> {
        lock(&self.0).clone()
    }

    pub fn position(&self, event: &ClientEvent) -> Option<usize> {
        lock(&self.0).iter().position(|e| e == event)
    }

    pub fn count(&self, event: &ClientEvent) -> usize {
        lock(&self.0).iter().filter(|e| *e == event).count()
    }
}

// ===== Fixture =====

/// Canned cluster contents for one broker
#[derive(Debug, Clone, Default)]
pub struct ClusterFixture {
    pub topics: Vec<Topic>,
    pub partitions: HashMap<String, Vec<Partition>>,
    pub groups: Vec<ConsumerGroup>,
    pub offsets: HashMap<String, Vec<ConsumerGroupOffset>>,
    pub schemas: Vec<SchemaEntry>,
    pub messages: Vec<Message>,
}

impl ClusterFixture {
    /// Rows prefixed with the broker name so tests can tell clusters apart.
    pub fn named(broker: &str) -> Self {
        let topic = |suffix: &str| Topic {
            name: format!("{broker}-{suffix}"),
            partitions: 2,
            replicas: 1,
            ..Topic::default()
        };
        let topics = vec![topic("orders"), topic("payments")];
        let partitions = topics
            .iter()
            .map(|t| {
                let rows = (0..2)
                    .map(|id| Partition {
                        id,
                        end_offset: 10,
                        message_count: 10,
                        ..Partition::default()
                    })
                    .collect();
                (t.name.clone(), rows)
            })
            .collect();
        let group = format!("{broker}-group");
        let offsets = HashMap::from([(
            group.clone(),
            vec![ConsumerGroupOffset {
                topic: format!("{broker}-orders"),
                partition: 0,
                lag: 1,
                offset: 9,
            }],
        )]);
        Self {
            topics,
            partitions,
            groups: vec![ConsumerGroup {
                name: group,
                state: "Stable".to_string(),
                members: 1,
            }],
            offsets,
            schemas: vec![SchemaEntry {
                subject: format!("{broker}-value"),
                version: 1,
                schema_type: "JSON".to_string(),
                schema: "{}".to_string(),
            }],
            messages: Vec::new(),
        }
    }
}

// ===== RecordingClientFactory =====

#[derive(Default)]
struct FactoryState {
    fixtures: HashMap<String, ClusterFixture>,
    fail_new_client: HashSet<String>,
    fail_connect: HashSet<String>,
    fail_ops: HashSet<(String, &'static str)>,
    connect_gates: HashMap<String, Arc<Notify>>,
    load_gates: HashMap<(String, &'static str), Arc<Notify>>,
}

/// Factory whose clients record into a shared [`Journal`]
#[derive(Clone, Default)]
pub struct RecordingClientFactory {
    journal: Journal,
    state: Arc<Mutex<FactoryState>>,
    created: Arc<Mutex<Vec<Arc<RecordingClusterClient>>>>,
}

impl RecordingClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn set_fixture(&self, broker: &str, fixture: ClusterFixture) {
        lock(&self.state).fixtures.insert(broker.to_string(), fixture);
    }

    pub fn fail_new_client(&self, broker: &str) {
        lock(&self.state).fail_new_client.insert(broker.to_string());
    }

    pub fn fail_connect(&self, broker: &str) {
        lock(&self.state).fail_connect.insert(broker.to_string());
    }

    /// Make `op` (e.g. `"list_topics"`) fail for `broker`.
    pub fn fail_op(&self, broker: &str, op: &'static str) {
        lock(&self.state).fail_ops.insert((broker.to_string(), op));
    }

    /// Hold `connect` for `broker` until the returned gate is notified.
    pub fn gate_connect(&self, broker: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.state)
            .connect_gates
            .insert(broker.to_string(), Arc::clone(&gate));
        gate
    }

    /// Hold `op` for `broker` until the returned gate is notified.
    pub fn gate_op(&self, broker: &str, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.state)
            .load_gates
            .insert((broker.to_string(), op), Arc::clone(&gate));
        gate
    }

    /// Every client handed out so far, oldest first.
    pub fn clients(&self) -> Vec<Arc<RecordingClusterClient>> {
        lock(&self.created).clone()
    }
}

impl ClientFactory for RecordingClientFactory {
    fn new_client(&self, profile: &BrokerProfile) -> CoreResult<Arc<dyn ClusterClient>> {
        let broker = profile.name.clone();
        let fixture = {
            let state = lock(&self.state);
            if state.fail_new_client.contains(&broker) {
                return Err(CoreError::Connection {
                    broker,
                    message: "client construction failed".to_string(),
                });
            }
            state
                .fixtures
                .get(&broker)
                .cloned()
                .unwrap_or_else(|| ClusterFixture::named(&broker))
        };

        self.journal.push(ClientEvent::Created(broker.clone()));
        let client = Arc::new(RecordingClusterClient {
            profile: profile.clone(),
            journal: self.journal.clone(),
            factory_state: Arc::clone(&self.state),
            data: Mutex::new(fixture),
            closed: Mutex::new(false),
            produced: Mutex::new(Vec::new()),
        });
        lock(&self.created).push(Arc::clone(&client));
        Ok(client)
    }
}

// ===== RecordingClusterClient =====

pub struct RecordingClusterClient {
    profile: BrokerProfile,
    journal: Journal,
    factory_state: Arc<Mutex<FactoryState>>,
    data: Mutex<ClusterFixture>,
    closed: Mutex<bool>,
    produced: Mutex<Vec<(String, String, String, Vec<Header>)>>,
}

impl RecordingClusterClient {
    pub fn broker(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &BrokerProfile {
        &self.profile
    }

    pub fn is_closed(&self) -> bool {
        *lock(&self.closed)
    }

    pub fn topic_names(&self) -> Vec<String> {
        lock(&self.data).topics.iter().map(|t| t.name.clone()).collect()
    }

    /// `(topic, key, value, headers)` of every produced record
    pub fn produced(&self) -> Vec<(String, String, String, Vec<Header>)> {
        lock(&self.produced).clone()
    }

    async fn enter(&self, op: &'static str) -> CoreResult<()> {
        self.journal.push(ClientEvent::Call {
            broker: self.profile.name.clone(),
            op,
        });
        let (gate, fail) = {
            let state = lock(&self.factory_state);
            let key = (self.profile.name.clone(), op);
            (state.load_gates.get(&key).cloned(), state.fail_ops.contains(&key))
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if fail {
            return Err(CoreError::Transport(format!("{op} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for RecordingClusterClient {
    async fn connect(&self) -> CoreResult<()> {
        let (gate, fail) = {
            let state = lock(&self.factory_state);
            (
                state.connect_gates.get(&self.profile.name).cloned(),
                state.fail_connect.contains(&self.profile.name),
            )
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if fail {
            return Err(CoreError::Connection {
                broker: self.profile.name.clone(),
                message: "connection refused".to_string(),
            });
        }
        self.journal
            .push(ClientEvent::Connected(self.profile.name.clone()));
        Ok(())
    }

    fn close(&self) {
        let mut closed = lock(&self.closed);
        if !*closed {
            *closed = true;
            self.journal.push(ClientEvent::Closed(self.profile.name.clone()));
        }
    }

    async fn list_topics(&self) -> CoreResult<Vec<Topic>> {
        self.enter("list_topics").await?;
        Ok(lock(&self.data).topics.clone())
    }

    async fn get_topic_partitions(&self, topic: &str) -> CoreResult<Vec<Partition>> {
        self.enter("get_topic_partitions").await?;
        lock(&self.data)
            .partitions
            .get(topic)
            .cloned()
            .ok_or_else(|| CoreError::TopicNotFound(topic.to_string()))
    }

    async fn create_topic(&self, config: &TopicConfig) -> CoreResult<()> {
        self.enter("create_topic").await?;
        let mut data = lock(&self.data);
        if data.topics.iter().any(|t| t.name == config.name) {
            return Err(CoreError::ValidationError(format!(
                "topic already exists: {}",
                config.name
            )));
        }
        data.topics.push(Topic {
            name: config.name.clone(),
            partitions: usize::try_from(config.partitions).unwrap_or(0),
            replicas: usize::try_from(config.replication_factor).unwrap_or(0),
            cleanup_policy: config.cleanup_policy,
            ..Topic::default()
        });
        Ok(())
    }

    async fn delete_topic(&self, topic: &str) -> CoreResult<()> {
        self.enter("delete_topic").await?;
        let mut data = lock(&self.data);
        let before = data.topics.len();
        data.topics.retain(|t| t.name != topic);
        if data.topics.len() == before {
            return Err(CoreError::TopicNotFound(topic.to_string()));
        }
        Ok(())
    }

    async fn get_topic_config(&self, topic: &str) -> CoreResult<TopicConfig> {
        self.enter("get_topic_config").await?;
        let data = lock(&self.data);
        let t = data
            .topics
            .iter()
            .find(|t| t.name == topic)
            .ok_or_else(|| CoreError::TopicNotFound(topic.to_string()))?;
        Ok(TopicConfig {
            name: t.name.clone(),
            partitions: i32::try_from(t.partitions).unwrap_or(i32::MAX),
            replication_factor: i32::try_from(t.replicas).unwrap_or(i32::MAX),
            cleanup_policy: t.cleanup_policy,
            min_in_sync_replicas: 1,
            retention_ms: 0,
        })
    }

    async fn update_topic_config(&self, config: &TopicConfig) -> CoreResult<()> {
        self.enter("update_topic_config").await?;
        let mut data = lock(&self.data);
        let t = data
            .topics
            .iter_mut()
            .find(|t| t.name == config.name)
            .ok_or_else(|| CoreError::TopicNotFound(config.name.clone()))?;
        t.cleanup_policy = config.cleanup_policy;
        Ok(())
    }

    async fn produce_message(
        &self,
        topic: &str,
        key: &str,
        value: &str,
        headers: &[Header],
    ) -> CoreResult<()> {
        self.enter("produce_message").await?;
        lock(&self.produced).push((
            topic.to_string(),
            key.to_string(),
            value.to_string(),
            headers.to_vec(),
        ));
        Ok(())
    }

    async fn consume_messages(
        &self,
        topic: &str,
        filter: &MessageFilter,
    ) -> CoreResult<Vec<Message>> {
        self.enter("consume_messages").await?;
        Ok(lock(&self.data)
            .messages
            .iter()
            .filter(|m| m.topic == topic)
            .filter(|m| filter.partition.is_none_or(|p| p == m.partition))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    async fn list_consumer_groups(&self) -> CoreResult<Vec<ConsumerGroup>> {
        self.enter("list_consumer_groups").await?;
        Ok(lock(&self.data).groups.clone())
    }

    async fn list_consumer_group_offsets(&self, group: &str) -> CoreResult<Vec<ConsumerGroupOffset>> {
        self.enter("list_consumer_group_offsets").await?;
        lock(&self.data)
            .offsets
            .get(group)
            .cloned()
            .ok_or_else(|| CoreError::ConsumerGroupNotFound(group.to_string()))
    }

    async fn list_schema_entries(&self) -> CoreResult<Vec<SchemaEntry>> {
        self.enter("list_schema_entries").await?;
        Ok(lock(&self.data).schemas.clone())
    }
}

// ===== MemoryProfileRepository =====

#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: RwLock<Vec<BrokerProfile>>,
    /// If Some, `save` returns this error
    save_error: RwLock<Option<String>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<BrokerProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
            save_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn stored(&self) -> Vec<BrokerProfile> {
        self.profiles.read().await.clone()
    }
}

#[async_trait]
impl BrokerProfileRepository for MemoryProfileRepository {
    async fn load(&self) -> CoreResult<Vec<BrokerProfile>> {
        Ok(self.profiles.read().await.clone())
    }

    async fn save(&self, profiles: &[BrokerProfile]) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        // Mirror a serialized store: the password never survives.
        *self.profiles.write().await = profiles
            .iter()
            .cloned()
            .map(|mut p| {
                p.password.clear();
                p
            })
            .collect();
        Ok(())
    }
}

// ===== MemoryCredentialStore =====

#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<String, Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save_credentials(&self, broker: &str, credentials: &Credentials) -> CoreResult<()> {
        self.credentials
            .write()
            .await
            .insert(broker.to_string(), credentials.clone());
        Ok(())
    }

    async fn get_credentials(&self, broker: &str) -> CoreResult<Option<Credentials>> {
        Ok(self.credentials.read().await.get(broker).cloned())
    }

    async fn delete_credentials(&self, broker: &str) -> CoreResult<()> {
        self.credentials.write().await.remove(broker);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn journal_orders_events_across_clients() {
        let factory = RecordingClientFactory::new();
        let a = factory.new_client(&BrokerProfile::new("a", "a:9092")).unwrap();
        a.connect().await.unwrap();
        a.close();
        a.close();
        let b = factory.new_client(&BrokerProfile::new("b", "b:9092")).unwrap();
        b.connect().await.unwrap();

        let journal = factory.journal();
        assert_eq!(journal.count(&ClientEvent::Closed("a".into())), 1);
        assert!(
            journal.position(&ClientEvent::Closed("a".into()))
                < journal.position(&ClientEvent::Connected("b".into()))
        );
    }

    #[tokio::test]
    async fn failing_operations_report_transport_errors() {
        let factory = RecordingClientFactory::new();
        factory.fail_op("a", "list_topics");
        let client = factory.new_client(&BrokerProfile::new("a", "a:9092")).unwrap();

        let err = client.list_topics().await.unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)));
        assert_eq!(client.list_consumer_groups().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn memory_repository_drops_passwords() {
        let repo = MemoryProfileRepository::new();
        let profile = BrokerProfile::new("a", "a:9092").with_sasl(
            crate::types::SaslMechanism::Plain,
            "u",
            "p",
        );
        repo.save(&[profile]).await.unwrap();
        let stored = repo.load().await.unwrap();
        assert_eq!(stored[0].username, "u");
        assert!(stored[0].password.is_empty());
    }
}

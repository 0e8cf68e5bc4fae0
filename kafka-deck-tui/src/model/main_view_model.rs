//! Selection cascade coordinator
//!
//! Owns the panel view models, the broker profiles and the one live cluster handle.
//! Selecting a broker tears the old handle down, connects a new one in the background
//! and then loads topics, consumer groups and schemas in parallel.
//!
//! Every switch bumps an epoch. Work started for an older epoch is discarded: a connect
//! that finishes late closes its own client, and a load result arriving on the UI thread
//! is applied only if its epoch is still current.
//!
//! ```text
//! brokers ──select──▶ switch_broker ──▶ close old ─▶ connect ─┬─▶ topics ──▶ topic detail
//!                                                             ├─▶ groups ──▶ group detail
//!                                                             └─▶ schemas ─▶ schema detail
//! message browser ──open──▶ message detail
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use kafka_deck_core::types::{BrokerProfile, TopicConfig};
use kafka_deck_core::{
    BrokerProfileRepository, ClientFactory, ClusterClient, CoreError, CredentialStore, Credentials,
};
use tokio::task::JoinHandle;

use crate::error::{UiError, UiResult};
use crate::message::{AppMessage, ContentMessage};
use crate::model::context::ViewContext;
use crate::model::panels::{
    BrokersViewModel, ConsumerGroupDetailViewModel, ConsumerGroupsViewModel, MessageBrowserViewModel,
    MessageDetailViewModel, SchemaRegistryDetailViewModel, SchemaRegistryViewModel,
    TopicDetailViewModel, TopicsViewModel,
};
use crate::model::wizard::{ProduceRequest, ValidationErrors};

/// External collaborators of the coordinator
#[derive(Clone)]
pub struct Services {
    pub factory: Arc<dyn ClientFactory>,
    pub profiles: Arc<dyn BrokerProfileRepository>,
    pub credentials: Arc<dyn CredentialStore>,
}

#[derive(Default)]
struct ActiveConnection {
    /// Bumped on every broker switch
    epoch: u64,
    broker: Option<String>,
    client: Option<Arc<dyn ClusterClient>>,
}

pub struct MainViewModel {
    pub brokers: Arc<BrokersViewModel>,
    pub topics: Arc<TopicsViewModel>,
    pub topic_detail: Arc<TopicDetailViewModel>,
    pub consumer_groups: Arc<ConsumerGroupsViewModel>,
    pub consumer_group_detail: Arc<ConsumerGroupDetailViewModel>,
    pub schema_registry: Arc<SchemaRegistryViewModel>,
    pub schema_registry_detail: Arc<SchemaRegistryDetailViewModel>,
    pub message_browser: Arc<MessageBrowserViewModel>,
    pub message_detail: Arc<MessageDetailViewModel>,
    profiles: RwLock<Vec<BrokerProfile>>,
    services: Services,
    connection: Mutex<ActiveConnection>,
    ctx: ViewContext,
}

impl MainViewModel {
    pub fn new(ctx: ViewContext, services: Services, message_limit: usize) -> Arc<Self> {
        Arc::new_cyclic(|weak: &std::sync::Weak<Self>| {
            let brokers = Arc::new(BrokersViewModel::new());
            let topics = Arc::new(TopicsViewModel::new(ctx.clone()));
            let topic_detail = Arc::new(TopicDetailViewModel::new(ctx.clone()));
            let consumer_groups = Arc::new(ConsumerGroupsViewModel::new());
            let consumer_group_detail = Arc::new(ConsumerGroupDetailViewModel::new(ctx.clone()));
            let schema_registry = Arc::new(SchemaRegistryViewModel::new());
            let schema_registry_detail = Arc::new(SchemaRegistryDetailViewModel::new());
            let message_browser = Arc::new(MessageBrowserViewModel::new(ctx.clone(), message_limit));
            let message_detail = Arc::new(MessageDetailViewModel::new());

            let main = weak.clone();
            brokers.set_on_selection_changed(move |broker| {
                if let Some(main) = main.upgrade() {
                    drop(main.switch_broker(&broker.name));
                }
            });

            let detail = Arc::clone(&topic_detail);
            let browser = Arc::clone(&message_browser);
            topics.set_on_selection_changed(move |topic| {
                detail.set_topic(Some(topic.clone()));
                browser.set_topic(Some(topic.name.clone()));
            });

            let detail = Arc::clone(&consumer_group_detail);
            consumer_groups.set_on_selection_changed(move |group| {
                detail.set_consumer_group(Some(group.clone()));
            });

            let detail = Arc::clone(&schema_registry_detail);
            schema_registry.set_on_selection_changed(move |schema| {
                detail.set_schema(Some(schema.clone()));
            });

            let detail = Arc::clone(&message_detail);
            let scheduler = ctx.scheduler.clone();
            message_browser.set_on_message_selected(move |message| {
                detail.set_message(Some(message.clone()));
                scheduler.send(AppMessage::Content(ContentMessage::ShowMessageDetail));
            });

            let scheduler = ctx.scheduler.clone();
            brokers.set_on_edit_requested(move || scheduler.send(AppMessage::EditProfiles));

            let scheduler = ctx.scheduler.clone();
            message_detail.set_on_close(move || {
                scheduler.send(AppMessage::Content(ContentMessage::CloseMessageDetail));
            });

            Self {
                brokers,
                topics,
                topic_detail,
                consumer_groups,
                consumer_group_detail,
                schema_registry,
                schema_registry_detail,
                message_browser,
                message_detail,
                profiles: RwLock::new(Vec::new()),
                services,
                connection: Mutex::new(ActiveConnection::default()),
                ctx,
            }
        })
    }

    fn lock_connection(&self) -> MutexGuard<'_, ActiveConnection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Connection state =====

    pub fn active_client(&self) -> Option<Arc<dyn ClusterClient>> {
        self.lock_connection().client.clone()
    }

    /// Broker most recently selected, connected or not.
    pub fn active_broker(&self) -> Option<String> {
        self.lock_connection().broker.clone()
    }

    pub fn profiles(&self) -> Vec<BrokerProfile> {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn profile(&self, name: &str) -> Option<BrokerProfile> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.lock_connection().epoch == epoch
    }

    /// Handle stored for `epoch`, `None` once a newer switch happened.
    fn client_for(&self, epoch: u64) -> Option<Arc<dyn ClusterClient>> {
        let conn = self.lock_connection();
        if conn.epoch == epoch {
            conn.client.clone()
        } else {
            None
        }
    }

    fn require_client(&self) -> UiResult<(u64, Arc<dyn ClusterClient>)> {
        let conn = self.lock_connection();
        conn.client
            .clone()
            .map(|client| (conn.epoch, client))
            .ok_or(UiError::NoActiveConnection)
    }

    fn inject_client(&self, client: Option<&Arc<dyn ClusterClient>>) {
        self.topics.set_client(client.cloned());
        self.topic_detail.set_client(client.cloned());
        self.consumer_group_detail.set_client(client.cloned());
        self.message_browser.set_client(client.cloned());
    }

    fn clear_dependents(&self) {
        self.topics.load(Vec::new());
        self.consumer_groups.load(Vec::new());
        self.schema_registry.load(Vec::new());
        self.schema_registry_detail.set_schema(None);
        self.message_browser.set_topic(None);
        self.message_detail.set_message(None);
    }

    // ===== Broker switch =====

    /// Make `name` the active broker.
    ///
    /// The previous handle is closed before this returns; connecting and loading run
    /// in the background. The returned task finishes once every dependent load has
    /// been scheduled.
    pub fn switch_broker(self: &Arc<Self>, name: &str) -> JoinHandle<()> {
        let (epoch, previous) = {
            let mut conn = self.lock_connection();
            conn.epoch += 1;
            conn.broker = Some(name.to_string());
            (conn.epoch, conn.client.take())
        };
        if let Some(previous) = previous {
            previous.close();
        }
        self.inject_client(None);
        self.topic_detail.set_topic(None);
        self.consumer_group_detail.set_consumer_group(None);
        self.clear_dependents();
        tracing::info!(broker = name, epoch, "switching broker");

        let this = Arc::clone(self);
        let name = name.to_string();
        self.ctx.runtime.spawn(async move { this.connect(epoch, name).await })
    }

    async fn open_client(&self, name: &str) -> UiResult<Arc<dyn ClusterClient>> {
        let mut profile = self
            .profile(name)
            .ok_or_else(|| CoreError::ProfileNotFound(name.to_string()))?;
        if profile.requires_credentials() && profile.password.is_empty() {
            if let Some(credentials) = self.services.credentials.get_credentials(name).await? {
                profile.username = credentials.username;
                profile.password = credentials.password;
            }
        }

        let client = self.services.factory.new_client(&profile)?;
        if let Err(e) = client.connect().await {
            client.close();
            return Err(e.into());
        }
        Ok(client)
    }

    async fn connect(self: Arc<Self>, epoch: u64, name: String) {
        let client = match self.open_client(&name).await {
            Ok(client) => client,
            Err(e) => {
                if self.is_current(epoch) {
                    self.ctx.report(&format!("failed to connect to {name}"), e);
                }
                return;
            }
        };

        {
            let mut conn = self.lock_connection();
            if conn.epoch != epoch {
                drop(conn);
                tracing::debug!(broker = %name, epoch, "connect superseded, closing client");
                client.close();
                return;
            }
            conn.client = Some(Arc::clone(&client));
            self.inject_client(Some(&client));
        }
        tracing::info!(broker = %name, "connected");

        futures::join!(
            self.load_topics(epoch),
            self.load_consumer_groups(epoch),
            self.load_schemas(epoch),
        );
    }

    /// Run `apply` on the UI thread unless a newer switch happened meanwhile.
    fn apply_if_current<F>(self: &Arc<Self>, epoch: u64, apply: F)
    where
        F: FnOnce(&Self) + Send + 'static,
    {
        let this = Arc::clone(self);
        self.ctx.scheduler.update(move || {
            if this.is_current(epoch) {
                apply(&this);
            } else {
                tracing::debug!(epoch, "dropping superseded result");
            }
        });
    }

    fn report_if_current(&self, epoch: u64, context: &str, err: UiError) {
        if self.is_current(epoch) {
            self.ctx.report(context, err);
        }
    }

    async fn load_topics(self: &Arc<Self>, epoch: u64) {
        let Some(client) = self.client_for(epoch) else {
            return;
        };
        match client.list_topics().await {
            Ok(topics) => self.apply_if_current(epoch, move |main| main.topics.load(topics)),
            Err(e) => self.report_if_current(epoch, "failed to load topics", e.into()),
        }
    }

    async fn load_consumer_groups(self: &Arc<Self>, epoch: u64) {
        let Some(client) = self.client_for(epoch) else {
            return;
        };
        match client.list_consumer_groups().await {
            Ok(groups) => self.apply_if_current(epoch, move |main| main.consumer_groups.load(groups)),
            Err(e) => self.report_if_current(epoch, "failed to load consumer groups", e.into()),
        }
    }

    async fn load_schemas(self: &Arc<Self>, epoch: u64) {
        let Some(client) = self.client_for(epoch) else {
            return;
        };
        match client.list_schema_entries().await {
            Ok(schemas) => self.apply_if_current(epoch, move |main| main.schema_registry.load(schemas)),
            Err(e) => self.report_if_current(epoch, "failed to load schemas", e.into()),
        }
    }

    // ===== Pass-through operations =====

    pub fn create_topic(self: &Arc<Self>, config: TopicConfig) -> UiResult<JoinHandle<()>> {
        let (epoch, client) = self.require_client()?;
        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            match client.create_topic(&config).await {
                Ok(()) => {
                    tracing::info!(topic = %config.name, "topic created");
                    this.ctx
                        .scheduler
                        .send(AppMessage::Status(format!("Topic '{}' created", config.name)));
                    this.load_topics(epoch).await;
                }
                Err(e) => this.ctx.report("failed to create topic", e.into()),
            }
        }))
    }

    pub fn produce_message(self: &Arc<Self>, request: ProduceRequest) -> UiResult<JoinHandle<()>> {
        let (epoch, client) = self.require_client()?;
        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            let ProduceRequest {
                topic,
                key,
                value,
                headers,
            } = request;
            match client.produce_message(&topic, &key, &value, &headers).await {
                Ok(()) => {
                    tracing::info!(topic = %topic, "message produced");
                    this.ctx
                        .scheduler
                        .send(AppMessage::Status(format!("Message produced to '{topic}'")));
                    this.apply_if_current(epoch, move |main| {
                        if main.message_browser.topic().as_deref() == Some(topic.as_str()) {
                            if let Err(e) = main.message_browser.refresh() {
                                if !e.is_silent() {
                                    main.ctx.report("failed to refresh messages", e);
                                }
                            }
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to produce message", e.into()),
            }
        }))
    }

    pub fn delete_topic(self: &Arc<Self>, name: String) -> UiResult<JoinHandle<()>> {
        let (epoch, client) = self.require_client()?;
        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            match client.delete_topic(&name).await {
                Ok(()) => {
                    tracing::info!(topic = %name, "topic deleted");
                    this.ctx
                        .scheduler
                        .send(AppMessage::Status(format!("Topic '{name}' deleted")));
                    this.apply_if_current(epoch, move |main| {
                        main.topics.delete_topic(&name);
                        if main.topic_detail.topic().is_some_and(|t| t.name == name) {
                            main.topic_detail.set_topic(main.topics.selected_topic());
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to delete topic", e.into()),
            }
        }))
    }

    pub fn update_topic_config(self: &Arc<Self>, config: TopicConfig) -> UiResult<JoinHandle<()>> {
        let (epoch, client) = self.require_client()?;
        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            match client.update_topic_config(&config).await {
                Ok(()) => {
                    tracing::info!(topic = %config.name, "topic config updated");
                    this.ctx
                        .scheduler
                        .send(AppMessage::Status(format!("Config of '{}' saved", config.name)));
                    let shown = match client.get_topic_config(&config.name).await {
                        Ok(fresh) => fresh,
                        Err(e) => {
                            tracing::warn!(topic = %config.name, error = %e, "reloading topic config failed");
                            config
                        }
                    };
                    this.apply_if_current(epoch, move |main| main.topic_detail.replace_config(shown));
                }
                Err(e) => this.ctx.report("failed to update topic config", e.into()),
            }
        }))
    }

    /// Fetch the config of `topic`; the result arrives as [`AppMessage::TopicConfigLoaded`].
    pub fn load_topic_config(self: &Arc<Self>, topic: String) -> UiResult<JoinHandle<()>> {
        let (epoch, client) = self.require_client()?;
        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            match client.get_topic_config(&topic).await {
                Ok(config) if this.is_current(epoch) => {
                    this.ctx.scheduler.send(AppMessage::TopicConfigLoaded(config));
                }
                Ok(_) => {}
                Err(e) => this.report_if_current(epoch, "failed to load topic config", e.into()),
            }
        }))
    }

    // ===== Profiles =====

    /// Add a broker row and persist it. The password goes to the credential store only.
    pub fn add_broker_profile(self: &Arc<Self>, profile: BrokerProfile) -> UiResult<JoinHandle<()>> {
        let snapshot = {
            let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
            if profiles.iter().any(|p| p.name == profile.name) {
                let mut errors = ValidationErrors::new();
                errors.add("name", format!("broker '{}' already exists", profile.name));
                return Err(errors.into());
            }
            profiles.push(profile.clone());
            profiles
                .iter()
                .cloned()
                .map(|mut p| {
                    p.password.clear();
                    p
                })
                .collect::<Vec<_>>()
        };
        self.brokers.add_broker(&profile);
        tracing::info!(broker = %profile.name, "broker profile added");

        let this = Arc::clone(self);
        Ok(self.ctx.runtime.spawn(async move {
            if profile.requires_credentials() {
                let credentials = Credentials {
                    username: profile.username.clone(),
                    password: profile.password.clone(),
                };
                if let Err(e) = this
                    .services
                    .credentials
                    .save_credentials(&profile.name, &credentials)
                    .await
                {
                    this.ctx.report("failed to save credentials", e.into());
                }
            }
            if let Err(e) = this.services.profiles.save(&snapshot).await {
                this.ctx.report("failed to save broker profiles", e.into());
            }
        }))
    }

    /// Load saved profiles into the brokers panel. Selecting the first row starts the cascade.
    pub fn load_initial_data(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match this.services.profiles.load().await {
                Ok(profiles) => {
                    tracing::info!(count = profiles.len(), "broker profiles loaded");
                    let rows = profiles
                        .iter()
                        .enumerate()
                        .map(|(id, p)| p.to_broker(id))
                        .collect();
                    *this.profiles.write().unwrap_or_else(PoisonError::into_inner) = profiles;
                    let main = Arc::clone(&this);
                    this.ctx.scheduler.update(move || main.brokers.load(rows));
                }
                Err(e) => this.ctx.report("failed to load broker profiles", e.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSink;
    use crate::event::{UiQueue, UiScheduler};
    use kafka_deck_core::testing::{
        ClientEvent, MemoryCredentialStore, MemoryProfileRepository, RecordingClientFactory,
    };
    use kafka_deck_core::types::{CleanupPolicy, SaslMechanism};

    struct Harness {
        main: Arc<MainViewModel>,
        queue: UiQueue,
        factory: RecordingClientFactory,
        repository: Arc<MemoryProfileRepository>,
        credentials: Arc<MemoryCredentialStore>,
        errors: Arc<Mutex<Vec<UiError>>>,
    }

    impl Harness {
        fn new(profiles: &[&str]) -> Self {
            let (scheduler, queue): (UiScheduler, UiQueue) = UiQueue::new();
            let errors = Arc::new(Mutex::new(Vec::new()));
            let sink_errors = Arc::clone(&errors);
            let sink: ErrorSink = Arc::new(move |e: UiError| sink_errors.lock().unwrap().push(e));
            let ctx = ViewContext::new(scheduler, tokio::runtime::Handle::current(), sink);

            let factory = RecordingClientFactory::new();
            let repository = Arc::new(MemoryProfileRepository::with_profiles(
                profiles
                    .iter()
                    .map(|n| BrokerProfile::new(*n, format!("{n}:9092")))
                    .collect(),
            ));
            let credentials = Arc::new(MemoryCredentialStore::new());
            let services = Services {
                factory: Arc::new(factory.clone()),
                profiles: repository.clone(),
                credentials: credentials.clone(),
            };
            Self {
                main: MainViewModel::new(ctx, services, 100),
                queue,
                factory,
                repository,
                credentials,
                errors,
            }
        }

        /// Load profiles without triggering the first-row cascade.
        async fn load_profiles(&mut self) {
            let stored = self.repository.stored().await;
            *self.main.profiles.write().unwrap() = stored;
        }

        fn drain(&mut self) {
            self.queue.drain();
        }

        fn error_count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn switch_closes_previous_handle_before_opening_next() {
        let mut h = Harness::new(&["a", "b"]);
        h.load_profiles().await;

        h.main.switch_broker("a").await.unwrap();
        h.main.switch_broker("b").await.unwrap();
        h.drain();

        let journal = h.factory.journal();
        let closed_a = journal.position(&ClientEvent::Closed("a".into())).unwrap();
        let created_b = journal.position(&ClientEvent::Created("b".into())).unwrap();
        assert!(closed_a < created_b);
        assert_eq!(h.main.active_broker().as_deref(), Some("b"));
        assert_eq!(h.main.topics.list.rows()[0].name, "b-orders");
        assert_eq!(h.error_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_connect_leaves_no_handle_and_reports_once() {
        let mut h = Harness::new(&["a", "b"]);
        h.load_profiles().await;
        h.factory.fail_connect("b");

        h.main.switch_broker("a").await.unwrap();
        h.main.switch_broker("b").await.unwrap();
        h.drain();

        assert!(h.main.active_client().is_none());
        assert_eq!(h.error_count(), 1);
        assert!(h.factory.clients().iter().all(|c| c.is_closed()));
        assert!(h.main.topics.list.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_profile_is_reported() {
        let mut h = Harness::new(&[]);
        h.main.switch_broker("ghost").await.unwrap();
        h.drain();

        let errors = h.errors.lock().unwrap();
        assert!(matches!(
            errors.as_slice(),
            [UiError::Core(CoreError::ProfileNotFound(name))] if name == "ghost"
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn superseded_connect_is_closed_and_discarded() {
        let mut h = Harness::new(&["a", "b"]);
        h.load_profiles().await;
        let gate = h.factory.gate_connect("a");

        let slow = h.main.switch_broker("a");
        h.main.switch_broker("b").await.unwrap();
        gate.notify_one();
        slow.await.unwrap();
        h.drain();

        let a = h.factory.clients().into_iter().find(|c| c.broker() == "a").unwrap();
        assert!(a.is_closed());
        assert_eq!(h.main.active_broker().as_deref(), Some("b"));
        assert!(h.main.topics.list.rows().iter().all(|t| t.name.starts_with("b-")));
        assert_eq!(h.error_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stale_load_results_are_dropped_on_the_ui_thread() {
        let mut h = Harness::new(&["a", "b"]);
        h.load_profiles().await;

        // results for "a" are queued but not applied before the switch
        h.main.switch_broker("a").await.unwrap();
        h.main.switch_broker("b").await.unwrap();
        h.drain();

        assert_eq!(h.main.consumer_groups.list.rows()[0].name, "b-group");
        assert_eq!(h.main.schema_registry.list.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_failing_load_does_not_block_the_others() {
        let mut h = Harness::new(&["a"]);
        h.load_profiles().await;
        h.factory.fail_op("a", "list_consumer_groups");

        h.main.switch_broker("a").await.unwrap();
        h.drain();

        assert_eq!(h.main.topics.list.len(), 2);
        assert_eq!(h.main.schema_registry.list.len(), 1);
        assert!(h.main.consumer_groups.list.is_empty());
        assert_eq!(h.error_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn pass_through_without_connection_fails_immediately() {
        let h = Harness::new(&[]);
        assert!(matches!(
            h.main.create_topic(TopicConfig::default()),
            Err(UiError::NoActiveConnection)
        ));
        assert!(matches!(
            h.main.produce_message(ProduceRequest {
                topic: "orders".into(),
                key: String::new(),
                value: String::new(),
                headers: Vec::new(),
            }),
            Err(UiError::NoActiveConnection)
        ));
        assert!(matches!(
            h.main.delete_topic("orders".into()),
            Err(UiError::NoActiveConnection)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_and_delete_topic_refresh_the_list() {
        let mut h = Harness::new(&["a"]);
        h.load_profiles().await;
        h.main.switch_broker("a").await.unwrap();
        h.drain();

        let config = TopicConfig {
            name: "audit".into(),
            partitions: 1,
            replication_factor: 1,
            min_in_sync_replicas: 1,
            ..TopicConfig::default()
        };
        h.main.create_topic(config).unwrap().await.unwrap();
        h.drain();
        assert_eq!(h.main.topics.list.len(), 3);

        h.main.delete_topic("a-orders".into()).unwrap().await.unwrap();
        h.drain();
        let names: Vec<_> = h.main.topics.list.rows().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a-payments".to_string(), "audit".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn saved_topic_config_replaces_the_cached_detail() {
        let mut h = Harness::new(&["a"]);
        h.load_profiles().await;
        h.main.switch_broker("a").await.unwrap();
        h.drain();
        assert_eq!(h.main.topic_detail.topic().unwrap().name, "a-orders");

        let config = TopicConfig {
            name: "a-orders".into(),
            cleanup_policy: CleanupPolicy::CompactDelete,
            ..TopicConfig::default()
        };
        h.main.update_topic_config(config).unwrap().await.unwrap();
        h.drain();

        let shown = h.main.topic_detail.config().unwrap();
        assert_eq!(shown.cleanup_policy, CleanupPolicy::CompactDelete);
        assert_eq!(h.error_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn produce_goes_to_active_client() {
        let mut h = Harness::new(&["a"]);
        h.load_profiles().await;
        h.main.switch_broker("a").await.unwrap();

        let request = ProduceRequest {
            topic: "a-orders".into(),
            key: "k".into(),
            value: "v".into(),
            headers: Vec::new(),
        };
        h.main.produce_message(request).unwrap().await.unwrap();

        let produced = h.factory.clients()[0].produced();
        assert_eq!(produced.len(), 1);
        assert_eq!(produced[0].0, "a-orders");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_browser_refresh_after_produce_is_reported() {
        let mut h = Harness::new(&["a"]);
        h.load_profiles().await;
        h.main.switch_broker("a").await.unwrap();
        h.drain();
        assert_eq!(h.main.message_browser.topic().as_deref(), Some("a-orders"));
        h.main.message_browser.set_client(None);

        let request = ProduceRequest {
            topic: "a-orders".into(),
            key: String::new(),
            value: "v".into(),
            headers: Vec::new(),
        };
        h.main.produce_message(request).unwrap().await.unwrap();
        h.drain();

        let errors = h.errors.lock().unwrap();
        assert!(matches!(errors.as_slice(), [UiError::NoActiveConnection]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn added_profiles_persist_without_password() {
        let h = Harness::new(&[]);
        let profile =
            BrokerProfile::new("secure", "kafka:9093").with_sasl(SaslMechanism::ScramSha256, "alice", "s3cret");

        h.main.add_broker_profile(profile.clone()).unwrap().await.unwrap();

        let stored = h.repository.stored().await;
        assert_eq!(stored.len(), 1);
        assert!(stored[0].password.is_empty());
        assert_eq!(stored[0].username, "alice");
        let credentials = h.credentials.get_credentials("secure").await.unwrap().unwrap();
        assert_eq!(credentials.password, "s3cret");
        assert_eq!(h.main.brokers.list.len(), 1);

        assert!(matches!(
            h.main.add_broker_profile(profile),
            Err(UiError::Validation(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sasl_credentials_are_attached_at_connect() {
        let mut h = Harness::new(&[]);
        let profile =
            BrokerProfile::new("secure", "kafka:9093").with_sasl(SaslMechanism::Plain, "alice", "");
        *h.main.profiles.write().unwrap() = vec![profile];
        h.credentials
            .save_credentials(
                "secure",
                &Credentials {
                    username: "alice".into(),
                    password: "s3cret".into(),
                },
            )
            .await
            .unwrap();

        h.main.switch_broker("secure").await.unwrap();
        h.drain();

        assert_eq!(h.factory.clients()[0].profile().password, "s3cret");
        assert!(h.main.active_client().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn initial_load_selects_first_broker() {
        let mut h = Harness::new(&["a", "b"]);
        h.main.load_initial_data().await.unwrap();
        h.drain();

        assert_eq!(h.main.brokers.list.selected_index(), Some(0));
        assert_eq!(h.main.active_broker().as_deref(), Some("a"));
        assert_eq!(h.main.profiles().len(), 2);
    }
}

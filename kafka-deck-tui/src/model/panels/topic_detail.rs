//! Topic detail pane: partitions and configuration of the selected topic

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kafka_deck_core::types::{Partition, Topic, TopicConfig};
use kafka_deck_core::ClusterClient;

use super::PanelViewModel;
use crate::model::command::CommandBinding;
use crate::model::context::{ClientSlot, ViewContext};
use crate::model::notifier::{ChangeField, ChangeHandler, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Partitions,
    Config,
    Messages,
}

impl DetailTab {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Partitions => "Partitions",
            Self::Config => "Config",
            Self::Messages => "Messages",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Partitions => Self::Config,
            Self::Config => Self::Messages,
            Self::Messages => Self::Partitions,
        }
    }
}

#[derive(Default)]
struct DetailState {
    topic: Option<Topic>,
    partitions: Vec<Partition>,
    config: Option<TopicConfig>,
    tab: DetailTab,
}

pub struct TopicDetailViewModel {
    state: RwLock<DetailState>,
    notifier: Notifier,
    client: ClientSlot,
    ctx: ViewContext,
}

impl TopicDetailViewModel {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            state: RwLock::new(DetailState::default()),
            notifier: Notifier::new(),
            client: ClientSlot::default(),
            ctx,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DetailState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DetailState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_client(&self, client: Option<Arc<dyn ClusterClient>>) {
        self.client.set(client);
    }

    pub fn topic(&self) -> Option<Topic> {
        self.read().topic.clone()
    }

    pub fn partitions(&self) -> Vec<Partition> {
        self.read().partitions.clone()
    }

    pub fn config(&self) -> Option<TopicConfig> {
        self.read().config.clone()
    }

    /// Show `topic` and load its partitions in the background.
    pub fn set_topic(self: &Arc<Self>, topic: Option<Topic>) {
        let name = topic.as_ref().map(|t| t.name.clone());
        let tab = {
            let mut state = self.write();
            state.topic = topic;
            state.partitions.clear();
            state.config = None;
            state.tab
        };
        self.notifier.notify(ChangeField::Items);

        if let Some(name) = name {
            self.load_partitions(name.clone());
            if tab == DetailTab::Config {
                self.load_config(name);
            }
        }
    }

    pub fn next_tab(self: &Arc<Self>) {
        let (tab, name, needs_config) = {
            let mut state = self.write();
            state.tab = state.tab.next();
            (
                state.tab,
                state.topic.as_ref().map(|t| t.name.clone()),
                state.config.is_none(),
            )
        };
        self.notifier.notify(ChangeField::Custom("tab"));

        if tab == DetailTab::Config && needs_config {
            if let Some(name) = name {
                self.load_config(name);
            }
        }
    }

    /// Show `config` if it belongs to the displayed topic.
    pub fn replace_config(&self, config: TopicConfig) {
        {
            let mut state = self.write();
            if !state.topic.as_ref().is_some_and(|t| t.name == config.name) {
                return;
            }
            state.config = Some(config);
        }
        self.notifier.notify(ChangeField::Items);
    }

    fn is_showing(&self, name: &str) -> bool {
        self.read().topic.as_ref().is_some_and(|t| t.name == name)
    }

    fn load_partitions(self: &Arc<Self>, name: String) {
        let Some(client) = self.client.get() else {
            return;
        };
        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match client.get_topic_partitions(&name).await {
                Ok(partitions) => {
                    let vm = Arc::clone(&this);
                    this.ctx.scheduler.update(move || {
                        // Selection moved on or broker switched: drop the stale result.
                        if vm.is_showing(&name) && vm.client.holds(&client) {
                            vm.write().partitions = partitions;
                            vm.notifier.notify(ChangeField::Items);
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to load partitions", e.into()),
            }
        });
    }

    fn load_config(self: &Arc<Self>, name: String) {
        let Some(client) = self.client.get() else {
            return;
        };
        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match client.get_topic_config(&name).await {
                Ok(config) => {
                    let vm = Arc::clone(&this);
                    this.ctx.scheduler.update(move || {
                        if vm.is_showing(&name) && vm.client.holds(&client) {
                            vm.write().config = Some(config);
                            vm.notifier.notify(ChangeField::Items);
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to load topic config", e.into()),
            }
        });
    }

    fn partition_rows(partitions: &[Partition]) -> Vec<String> {
        let mut rows = vec![format!(
            "{:<6} {:<8} {:<24} {:>10} {:>10} {:>10}",
            "ID", "LEADER", "REPLICAS", "START", "END", "MESSAGES"
        )];
        rows.extend(partitions.iter().map(|p| {
            format!(
                "{:<6} {:<8} {:<24} {:>10} {:>10} {:>10}",
                p.id,
                p.leader,
                format_replicas(&p.replicas),
                p.start_offset,
                p.end_offset,
                p.message_count
            )
        }));
        rows
    }

    fn config_rows(config: Option<&TopicConfig>) -> Vec<String> {
        let Some(c) = config else {
            return vec!["Loading configuration...".to_string()];
        };
        vec![
            format!("partitions           {}", c.partitions),
            format!("replication.factor   {}", c.replication_factor),
            format!("cleanup.policy       {}", c.cleanup_policy),
            format!("min.insync.replicas  {}", c.min_in_sync_replicas),
            format!("retention.ms         {}", c.retention_ms),
            String::new(),
            "Press c to edit".to_string(),
        ]
    }
}

fn format_replicas(replicas: &[i32]) -> String {
    let ids: Vec<String> = replicas.iter().map(ToString::to_string).collect();
    format!("[{}]", ids.join(","))
}

impl PanelViewModel for TopicDetailViewModel {
    fn title(&self) -> String {
        let state = self.read();
        let name = state.topic.as_ref().map_or("Details", |t| t.name.as_str());
        format!("{name} [{}]", state.tab.label())
    }

    fn display_rows(&self) -> Vec<String> {
        let state = self.read();
        if state.topic.is_none() {
            return vec!["No topic selected".to_string()];
        }
        match state.tab {
            DetailTab::Partitions => Self::partition_rows(&state.partitions),
            DetailTab::Config => Self::config_rows(state.config.as_ref()),
            DetailTab::Messages => vec![
                "Press m to browse messages of this topic".to_string(),
                "Press p to produce a message".to_string(),
            ],
        }
    }

    fn selected_index(&self) -> Option<usize> {
        None
    }

    fn command_bindings(self: Arc<Self>) -> Vec<CommandBinding> {
        Vec::new()
    }

    fn set_on_change(&self, handler: ChangeHandler) {
        self.notifier.on_change(move |e| handler(e));
    }
}

//! Consumer group detail pane: committed offsets and lag

use std::sync::{Arc, PoisonError, RwLock};

use kafka_deck_core::types::{ConsumerGroup, ConsumerGroupOffset};
use kafka_deck_core::ClusterClient;

use super::PanelViewModel;
use crate::model::command::CommandBinding;
use crate::model::context::{ClientSlot, ViewContext};
use crate::model::notifier::{ChangeField, ChangeHandler, Notifier};

#[derive(Default)]
struct GroupState {
    group: Option<ConsumerGroup>,
    offsets: Vec<ConsumerGroupOffset>,
}

pub struct ConsumerGroupDetailViewModel {
    state: RwLock<GroupState>,
    notifier: Notifier,
    client: ClientSlot,
    ctx: ViewContext,
}

impl ConsumerGroupDetailViewModel {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            state: RwLock::new(GroupState::default()),
            notifier: Notifier::new(),
            client: ClientSlot::default(),
            ctx,
        }
    }

    pub fn set_client(&self, client: Option<Arc<dyn ClusterClient>>) {
        self.client.set(client);
    }

    pub fn group(&self) -> Option<ConsumerGroup> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .group
            .clone()
    }

    pub fn offsets(&self) -> Vec<ConsumerGroupOffset> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .offsets
            .clone()
    }

    /// Show `group` and fetch its offsets in the background.
    pub fn set_consumer_group(self: &Arc<Self>, group: Option<ConsumerGroup>) {
        let name = group.as_ref().map(|g| g.name.clone());
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.group = group;
            state.offsets.clear();
        }
        self.notifier.notify(ChangeField::Items);

        let (Some(name), Some(client)) = (name, self.client.get()) else {
            return;
        };
        let this = Arc::clone(self);
        self.ctx.runtime.spawn(async move {
            match client.list_consumer_group_offsets(&name).await {
                Ok(offsets) => {
                    let vm = Arc::clone(&this);
                    this.ctx.scheduler.update(move || {
                        let current = vm.group().is_some_and(|g| g.name == name);
                        if current && vm.client.holds(&client) {
                            vm.state
                                .write()
                                .unwrap_or_else(PoisonError::into_inner)
                                .offsets = offsets;
                            vm.notifier.notify(ChangeField::Items);
                        }
                    });
                }
                Err(e) => this.ctx.report("failed to load consumer group offsets", e.into()),
            }
        });
    }
}

impl PanelViewModel for ConsumerGroupDetailViewModel {
    fn title(&self) -> String {
        self.group()
            .map_or_else(|| "Consumer Group".to_string(), |g| format!("Group: {}", g.name))
    }

    fn display_rows(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let Some(group) = &state.group else {
            return vec!["No consumer group selected".to_string()];
        };
        let total_lag: i64 = state.offsets.iter().map(|o| o.lag).sum();
        let mut rows = vec![
            format!("State: {}   Members: {}   Total lag: {total_lag}", group.state, group.members),
            String::new(),
            format!("{:<32} {:>9} {:>12} {:>10}", "TOPIC", "PARTITION", "OFFSET", "LAG"),
        ];
        rows.extend(state.offsets.iter().map(|o| {
            format!("{:<32} {:>9} {:>12} {:>10}", o.topic, o.partition, o.offset, o.lag)
        }));
        rows
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

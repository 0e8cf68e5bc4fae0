//! Modal slot
//!
//! At most one modal is open. Showing another while one is open does nothing, which
//! absorbs duplicate key events. Every way out (submit, cancel) goes through
//! [`PopupManager::close`], which restores the focus captured on open.

use kafka_deck_core::types::{BrokerProfile, TopicConfig};

use crate::error::{UiError, UiResult};
use crate::model::focus::PanelId;
use crate::model::wizard::{
    AddBrokerWizard, AddTopicWizard, ConfirmAction, ConfirmDialog, Form, ProduceMessageForm,
    ProduceRequest, TopicConfigEditor, ValidationErrors,
};

/// Open modal and its form state
#[derive(Debug)]
pub enum Modal {
    AddBroker(AddBrokerWizard),
    AddTopic(AddTopicWizard),
    ProduceMessage(ProduceMessageForm),
    Confirm(ConfirmDialog),
    TopicConfig(TopicConfigEditor),
}

impl Modal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddBroker(_) => "add_broker",
            Self::AddTopic(_) => "add_topic",
            Self::ProduceMessage(_) => "produce_message",
            Self::Confirm(_) => "confirm",
            Self::TopicConfig(_) => "topic_config",
        }
    }

    /// Form surface, `None` for the confirmation dialog.
    pub fn form(&self) -> Option<&dyn Form> {
        match self {
            Self::AddBroker(w) => Some(w),
            Self::AddTopic(w) => Some(w),
            Self::ProduceMessage(w) => Some(w),
            Self::TopicConfig(w) => Some(w),
            Self::Confirm(_) => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut dyn Form> {
        match self {
            Self::AddBroker(w) => Some(w),
            Self::AddTopic(w) => Some(w),
            Self::ProduceMessage(w) => Some(w),
            Self::TopicConfig(w) => Some(w),
            Self::Confirm(_) => None,
        }
    }

    fn submission(&mut self) -> Result<Submission, ValidationErrors> {
        Ok(match self {
            Self::AddBroker(w) => Submission::AddBroker(w.submit()?),
            Self::AddTopic(w) => Submission::AddTopic(w.submit()?),
            Self::ProduceMessage(w) => Submission::Produce(w.submit()?),
            Self::TopicConfig(w) => Submission::TopicConfig(w.submit()?),
            Self::Confirm(d) => Submission::Confirm(d.action.clone()),
        })
    }
}

/// Validated payload of a submitted modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    AddBroker(BrokerProfile),
    AddTopic(TopicConfig),
    Produce(ProduceRequest),
    Confirm(ConfirmAction),
    TopicConfig(TopicConfig),
}

#[derive(Debug, Default)]
pub struct PopupManager {
    active: Option<Modal>,
    previous_focus: Option<PanelId>,
    /// Failure of the last submit handler, shown inside the modal
    error: Option<String>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    #[cfg(test)]
    pub fn previous_focus(&self) -> Option<PanelId> {
        self.previous_focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn show(&mut self, modal: Modal, focus: PanelId) -> bool {
        if let Some(active) = &self.active {
            tracing::debug!(active = active.name(), requested = modal.name(), "popup already open");
            return false;
        }
        tracing::debug!(popup = modal.name(), ?focus, "popup opened");
        self.previous_focus = Some(focus);
        self.error = None;
        self.active = Some(modal);
        true
    }

    pub fn show_add_broker_popup(&mut self, focus: PanelId, existing_names: Vec<String>) -> bool {
        self.show(Modal::AddBroker(AddBrokerWizard::add_broker(existing_names)), focus)
    }

    pub fn show_add_topic_popup(&mut self, focus: PanelId) -> bool {
        self.show(Modal::AddTopic(AddTopicWizard::add_topic()), focus)
    }

    pub fn show_produce_message_popup(&mut self, focus: PanelId, topic: &str) -> bool {
        self.show(Modal::ProduceMessage(ProduceMessageForm::produce(topic)), focus)
    }

    pub fn show_confirm_popup(&mut self, focus: PanelId, message: &str, action: ConfirmAction) -> bool {
        self.show(Modal::Confirm(ConfirmDialog::new(message, action)), focus)
    }

    pub fn show_topic_config_popup(&mut self, focus: PanelId, config: &TopicConfig) -> bool {
        self.show(Modal::TopicConfig(TopicConfigEditor::edit(config)), focus)
    }

    /// Drop the modal and return the panel that should get focus back.
    ///
    /// Falls back to the brokers panel when the pre-modal panel is gone.
    pub fn close(&mut self, is_available: impl Fn(PanelId) -> bool) -> PanelId {
        if let Some(modal) = self.active.take() {
            tracing::debug!(popup = modal.name(), "popup closed");
        }
        self.error = None;
        self.previous_focus
            .take()
            .filter(|p| is_available(*p))
            .unwrap_or_default()
    }

    /// Advance the active form. `true` when it was already on its terminal step,
    /// or when the dialog has no steps.
    pub fn next_step(&mut self) -> bool {
        match self.active.as_mut().map(Modal::form_mut) {
            Some(Some(form)) => form.next_step(),
            Some(None) => true,
            None => false,
        }
    }

    pub fn prev_step(&mut self) -> bool {
        self.active
            .as_mut()
            .and_then(Modal::form_mut)
            .is_some_and(|form| form.prev_step())
    }

    pub fn input(&mut self, ch: char) {
        if let Some(form) = self.active.as_mut().and_then(Modal::form_mut) {
            form.input(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(form) = self.active.as_mut().and_then(Modal::form_mut) {
            form.backspace();
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        if let Some(form) = self.active.as_mut().and_then(Modal::form_mut) {
            form.cycle(forward);
        }
    }

    /// Validate the active modal and hand its payload to `handler`.
    ///
    /// The modal stays open on validation or handler failure; the caller closes it
    /// after `Ok`.
    pub fn submit_with<F>(&mut self, handler: F) -> UiResult<()>
    where
        F: FnOnce(Submission) -> UiResult<()>,
    {
        let Some(modal) = self.active.as_mut() else {
            return Ok(());
        };
        let result = modal.submission().map_err(UiError::from).and_then(handler);
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }
}

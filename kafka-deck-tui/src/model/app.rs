//! Application state

use std::sync::Arc;

use super::main_view_model::MainViewModel;
use super::notifier::RedrawFlag;
use super::panels::PanelViewModel;
use super::popup::PopupManager;
use super::PanelId;

/// Which message view, if any, replaces the detail pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageView {
    #[default]
    Hidden,
    Browser,
    Detail,
}

impl MessageView {
    /// Whether `panel` is on screen under this view.
    pub fn shows(self, panel: PanelId) -> bool {
        match panel {
            PanelId::MessageBrowser => self != Self::Hidden,
            PanelId::MessageDetail => self == Self::Detail,
            _ => true,
        }
    }
}

pub struct App {
    pub should_quit: bool,

    /// Main loop suspends the terminal and opens the profile file
    pub edit_profiles: bool,

    /// Panel receiving keys when no popup is open
    pub focus: PanelId,

    pub status_message: Option<String>,

    /// Last error, rendered as ` Error: ...` until the next status
    pub error_message: Option<String>,

    /// Panels and the cluster handle
    pub main: Arc<MainViewModel>,

    pub popup: PopupManager,

    pub message_view: MessageView,

    /// Set by every view-model change; cleared when a frame is drawn
    pub redraw: RedrawFlag,
}

impl App {
    pub fn new(main: Arc<MainViewModel>) -> Self {
        let redraw = RedrawFlag::new();
        for panel in [
            PanelId::Brokers,
            PanelId::Topics,
            PanelId::ConsumerGroups,
            PanelId::SchemaRegistry,
            PanelId::MessageBrowser,
            PanelId::MessageDetail,
        ] {
            panel_of(&main, panel).set_on_change(Arc::new(redraw.handler()));
        }
        for detail in [
            detail_of(&main, PanelId::Topics),
            detail_of(&main, PanelId::ConsumerGroups),
            detail_of(&main, PanelId::SchemaRegistry),
        ]
        .into_iter()
        .flatten()
        {
            detail.set_on_change(Arc::new(redraw.handler()));
        }

        Self {
            should_quit: false,
            edit_profiles: false,
            focus: PanelId::default(),
            status_message: None,
            error_message: None,
            main,
            popup: PopupManager::new(),
            message_view: MessageView::Hidden,
            redraw,
        }
    }

    /// Consume a pending editor request.
    pub fn take_edit_request(&mut self) -> bool {
        std::mem::take(&mut self.edit_profiles)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.error_message = None;
        self.redraw.mark();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.redraw.mark();
    }

    /// Whether `panel` is on screen and can take focus.
    pub fn is_available(&self, panel: PanelId) -> bool {
        self.message_view.shows(panel)
    }

    pub fn panel(&self, panel: PanelId) -> Arc<dyn PanelViewModel> {
        panel_of(&self.main, panel)
    }

    /// Detail pane paired with a sidebar panel.
    pub fn detail(&self, panel: PanelId) -> Option<Arc<dyn PanelViewModel>> {
        detail_of(&self.main, panel)
    }

    /// Sidebar panel whose detail pane is showing
    pub fn sidebar_focus(&self) -> PanelId {
        if self.focus.is_sidebar() {
            self.focus
        } else {
            PanelId::Topics
        }
    }
}

fn panel_of(main: &MainViewModel, panel: PanelId) -> Arc<dyn PanelViewModel> {
    match panel {
        PanelId::Brokers => main.brokers.clone(),
        PanelId::Topics => main.topics.clone(),
        PanelId::ConsumerGroups => main.consumer_groups.clone(),
        PanelId::SchemaRegistry => main.schema_registry.clone(),
        PanelId::MessageBrowser => main.message_browser.clone(),
        PanelId::MessageDetail => main.message_detail.clone(),
    }
}

fn detail_of(main: &MainViewModel, panel: PanelId) -> Option<Arc<dyn PanelViewModel>> {
    match panel {
        PanelId::Topics => Some(main.topic_detail.clone()),
        PanelId::ConsumerGroups => Some(main.consumer_group_detail.clone()),
        PanelId::SchemaRegistry => Some(main.schema_registry_detail.clone()),
        _ => None,
    }
}

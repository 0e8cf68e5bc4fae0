//! Panel focus

/// Focusable panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelId {
    #[default]
    Brokers,
    Topics,
    ConsumerGroups,
    SchemaRegistry,
    MessageBrowser,
    MessageDetail,
}

impl PanelId {
    /// Sidebar panels in display order; `1`-`4` jump to them.
    pub const SIDEBAR: [PanelId; 4] = [
        PanelId::Brokers,
        PanelId::Topics,
        PanelId::ConsumerGroups,
        PanelId::SchemaRegistry,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Brokers => "Brokers",
            Self::Topics => "Topics",
            Self::ConsumerGroups => "Consumer Groups",
            Self::SchemaRegistry => "Schema Registry",
            Self::MessageBrowser => "Messages",
            Self::MessageDetail => "Message",
        }
    }

    pub fn is_sidebar(self) -> bool {
        Self::SIDEBAR.contains(&self)
    }

    /// Sidebar panel for a `1`-based shortcut number.
    pub fn from_shortcut(n: u32) -> Option<Self> {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::SIDEBAR.get(index).copied()
    }

    /// Next sidebar panel, wrapping. Non-sidebar panels move to the first one.
    pub fn next(self) -> Self {
        Self::SIDEBAR
            .iter()
            .position(|p| *p == self)
            .map_or(Self::Brokers, |i| Self::SIDEBAR[(i + 1) % Self::SIDEBAR.len()])
    }

    /// Previous sidebar panel, wrapping.
    pub fn prev(self) -> Self {
        Self::SIDEBAR
            .iter()
            .position(|p| *p == self)
            .map_or(Self::Brokers, |i| {
                Self::SIDEBAR[(i + Self::SIDEBAR.len() - 1) % Self::SIDEBAR.len()]
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_cycle_wraps() {
        assert_eq!(PanelId::SchemaRegistry.next(), PanelId::Brokers);
        assert_eq!(PanelId::Brokers.prev(), PanelId::SchemaRegistry);
        assert_eq!(PanelId::MessageBrowser.next(), PanelId::Brokers);
    }

    #[test]
    fn shortcuts_map_to_sidebar() {
        assert_eq!(PanelId::from_shortcut(1), Some(PanelId::Brokers));
        assert_eq!(PanelId::from_shortcut(4), Some(PanelId::SchemaRegistry));
        assert_eq!(PanelId::from_shortcut(0), None);
        assert_eq!(PanelId::from_shortcut(5), None);
    }
}

use kafka_deck_core::types::{parse_retention, CleanupPolicy, TopicConfig, MILLIS_PER_DAY};

use super::{positive_int, FieldKind, FormFields, Step, Transition, ValidationErrors, Wizard};

pub(crate) const CLEANUP_OPTIONS: &[&str] = &["Delete", "Compact", "Compact-Delete"];

/// Retention used when the field is left empty
const DEFAULT_RETENTION_MS: i64 = 7 * MILLIS_PER_DAY;

pub(crate) fn cleanup_from_label(label: &str) -> CleanupPolicy {
    CleanupPolicy::options()
        .iter()
        .copied()
        .find(|p| p.label() == label)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTopicStep {
    TopicName,
    Partitions,
    ReplicationFactor,
    CleanupPolicy,
    MinIsr,
    Retention,
}

pub type AddTopicWizard = Wizard<AddTopicStep>;

impl AddTopicWizard {
    pub fn add_topic() -> Self {
        let fields = FormFields::new()
            .with("cleanup_policy", CleanupPolicy::Delete.label())
            .with("min_isr", "1");
        Wizard::new("Create Topic", fields, ())
    }
}

impl Step for AddTopicStep {
    type Output = TopicConfig;
    type Context = ();

    const FIRST: Self = Self::TopicName;

    fn next(self, _fields: &FormFields) -> Transition<Self> {
        match self {
            Self::TopicName => Transition::Step(Self::Partitions),
            Self::Partitions => Transition::Step(Self::ReplicationFactor),
            Self::ReplicationFactor => Transition::Step(Self::CleanupPolicy),
            Self::CleanupPolicy => Transition::Step(Self::MinIsr),
            Self::MinIsr => Transition::Step(Self::Retention),
            Self::Retention => Transition::Submit,
        }
    }

    fn prev(self, _fields: &FormFields) -> Option<Self> {
        match self {
            Self::TopicName => None,
            Self::Partitions => Some(Self::TopicName),
            Self::ReplicationFactor => Some(Self::Partitions),
            Self::CleanupPolicy => Some(Self::ReplicationFactor),
            Self::MinIsr => Some(Self::CleanupPolicy),
            Self::Retention => Some(Self::MinIsr),
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::TopicName => "name",
            Self::Partitions => "partitions",
            Self::ReplicationFactor => "replication_factor",
            Self::CleanupPolicy => "cleanup_policy",
            Self::MinIsr => "min_isr",
            Self::Retention => "retention",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TopicName => "Topic name:",
            Self::Partitions => "Number of partitions:",
            Self::ReplicationFactor => "Replication factor:",
            Self::CleanupPolicy => "Cleanup policy (use arrow keys, Enter to confirm):",
            Self::MinIsr => "Min in-sync replicas:",
            Self::Retention => "Retention time (e.g., 7d, 168h, or leave empty):",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::CleanupPolicy => FieldKind::Choice(CLEANUP_OPTIONS),
            _ => FieldKind::Text,
        }
    }

    fn validate(fields: &FormFields, _context: &()) -> Result<TopicConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = fields.trimmed("name");
        if name.is_empty() {
            errors.add("name", "topic name is required");
        }

        let partitions = positive_int(fields.get("partitions"));
        if partitions.is_none() {
            errors.add("partitions", "partitions must be a positive integer");
        }

        let replication = positive_int(fields.get("replication_factor"));
        if replication.is_none() {
            errors.add("replication_factor", "replication factor must be a positive integer");
        }

        let min_isr = positive_int(fields.get("min_isr"));
        match (min_isr, replication) {
            (None, _) => errors.add("min_isr", "min ISR must be a positive integer"),
            (Some(isr), Some(rf)) if isr > rf => {
                errors.add("min_isr", "min ISR cannot exceed replication factor");
            }
            _ => {}
        }

        let retention = fields.trimmed("retention");
        let retention_ms = if retention.is_empty() {
            DEFAULT_RETENTION_MS
        } else {
            parse_retention(retention).unwrap_or_else(|_| {
                errors.add("retention", "invalid retention format");
                DEFAULT_RETENTION_MS
            })
        };

        errors.into_result(TopicConfig {
            name: name.to_string(),
            partitions: partitions.unwrap_or(1),
            replication_factor: replication.unwrap_or(1),
            cleanup_policy: cleanup_from_label(fields.get("cleanup_policy")),
            min_in_sync_replicas: min_isr.unwrap_or(1),
            retention_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rf: &str, isr: &str) -> AddTopicWizard {
        let mut w = AddTopicWizard::add_topic();
        for value in ["orders", "3", rf] {
            value.chars().for_each(|c| w.input(c));
            w.next_step();
        }
        // cleanup policy keeps its default
        w.next_step();
        w.backspace();
        isr.chars().for_each(|c| w.input(c));
        w.next_step();
        w
    }

    #[test]
    fn transitions_cover_every_step_once() {
        let mut w = AddTopicWizard::add_topic();
        let mut seen = vec![w.step()];
        while !w.next_step() {
            seen.push(w.step());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(w.step(), AddTopicStep::Retention);
    }

    #[test]
    fn isr_above_replication_factor_is_rejected() {
        let mut w = filled("3", "5");
        assert_eq!(w.step(), AddTopicStep::Retention);
        let errors = w.submit().unwrap_err();
        assert_eq!(errors.get("min_isr"), Some("min ISR cannot exceed replication factor"));
    }

    #[test]
    fn empty_retention_defaults_to_seven_days() {
        let mut w = filled("3", "2");
        let config = w.submit().unwrap();
        assert_eq!(config.name, "orders");
        assert_eq!(config.partitions, 3);
        assert_eq!(config.replication_factor, 3);
        assert_eq!(config.min_in_sync_replicas, 2);
        assert_eq!(config.cleanup_policy, CleanupPolicy::Delete);
        assert_eq!(config.retention_ms, 7 * MILLIS_PER_DAY);
    }

    #[test]
    fn bad_numbers_and_retention_are_all_reported() {
        let mut w = AddTopicWizard::add_topic();
        w.next_step();
        "-1".chars().for_each(|c| w.input(c));
        w.next_step();
        "x".chars().for_each(|c| w.input(c));
        w.next_step();
        w.cycle(true);
        w.next_step();
        w.next_step();
        "soon".chars().for_each(|c| w.input(c));

        let errors = w.submit().unwrap_err();
        assert_eq!(errors.get("name"), Some("topic name is required"));
        assert_eq!(errors.get("partitions"), Some("partitions must be a positive integer"));
        assert_eq!(
            errors.get("replication_factor"),
            Some("replication factor must be a positive integer")
        );
        assert_eq!(errors.get("retention"), Some("invalid retention format"));
        assert_eq!(cleanup_from_label(w.fields().get("cleanup_policy")), CleanupPolicy::Compact);
    }
}

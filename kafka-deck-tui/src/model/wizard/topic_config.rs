use kafka_deck_core::types::{parse_retention, TopicConfig, MILLIS_PER_DAY};

use super::add_topic::{cleanup_from_label, CLEANUP_OPTIONS};
use super::{FieldKind, FormFields, Step, Transition, ValidationErrors, Wizard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicConfigStep {
    Partitions,
    Replication,
    Cleanup,
    MinInSync,
    Retention,
}

pub type TopicConfigEditor = Wizard<TopicConfigStep>;

/// Kafka's `retention.ms = -1`
const INFINITE_RETENTION: i64 = -1;

/// Infinite (or unset) retention shows as an empty field.
fn format_retention(ms: i64) -> String {
    if ms <= 0 {
        String::new()
    } else if ms % MILLIS_PER_DAY == 0 {
        format!("{}d", ms / MILLIS_PER_DAY)
    } else {
        format!("{ms}ms")
    }
}

impl TopicConfigEditor {
    /// Editor prefilled with the topic's current settings.
    pub fn edit(config: &TopicConfig) -> Self {
        let fields = FormFields::new()
            .with("partitions", config.partitions.to_string())
            .with("replication", config.replication_factor.to_string())
            .with("cleanup", config.cleanup_policy.label())
            .with("minsync", config.min_in_sync_replicas.to_string())
            .with("retention", format_retention(config.retention_ms));
        Wizard::new(format!("Topic Config: {}", config.name), fields, config.clone())
    }
}

/// Integer field, `None` when unparsable.
fn int_field(fields: &FormFields, field: &'static str, errors: &mut ValidationErrors) -> Option<i32> {
    let parsed = fields.trimmed(field).parse::<i32>().ok();
    if parsed.is_none() {
        errors.add(field, "must be a number");
    }
    parsed
}

impl Step for TopicConfigStep {
    type Output = TopicConfig;
    /// Config as loaded, before edits
    type Context = TopicConfig;

    const FIRST: Self = Self::Partitions;

    fn next(self, _fields: &FormFields) -> Transition<Self> {
        match self {
            Self::Partitions => Transition::Step(Self::Replication),
            Self::Replication => Transition::Step(Self::Cleanup),
            Self::Cleanup => Transition::Step(Self::MinInSync),
            Self::MinInSync => Transition::Step(Self::Retention),
            Self::Retention => Transition::Submit,
        }
    }

    fn prev(self, _fields: &FormFields) -> Option<Self> {
        match self {
            Self::Partitions => None,
            Self::Replication => Some(Self::Partitions),
            Self::Cleanup => Some(Self::Replication),
            Self::MinInSync => Some(Self::Cleanup),
            Self::Retention => Some(Self::MinInSync),
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::Partitions => "partitions",
            Self::Replication => "replication",
            Self::Cleanup => "cleanup",
            Self::MinInSync => "minsync",
            Self::Retention => "retention",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Partitions => "Partitions:",
            Self::Replication => "Replication factor:",
            Self::Cleanup => "Cleanup policy:",
            Self::MinInSync => "Min in-sync replicas:",
            Self::Retention => "Retention (e.g., 7d, 168h, empty for infinite):",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Cleanup => FieldKind::Choice(CLEANUP_OPTIONS),
            _ => FieldKind::Text,
        }
    }

    fn validate(fields: &FormFields, original: &TopicConfig) -> Result<TopicConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let partitions = int_field(fields, "partitions", &mut errors);
        if partitions.is_some_and(|p| p < 1) {
            errors.add("partitions", "must be at least 1");
        }
        let replication = int_field(fields, "replication", &mut errors);
        if replication.is_some_and(|r| r < 1) {
            errors.add("replication", "must be at least 1");
        }
        let min_isr = int_field(fields, "minsync", &mut errors);
        match (min_isr, replication) {
            (Some(isr), _) if isr < 1 => errors.add("minsync", "must be at least 1"),
            (Some(isr), Some(rf)) if isr > rf => errors.add("minsync", "cannot exceed replication factor"),
            _ => {}
        }

        let retention = fields.trimmed("retention");
        let retention_ms = match parse_retention(retention) {
            _ if retention.is_empty() => INFINITE_RETENTION,
            Ok(ms) if ms < 0 => {
                errors.add("retention", "must be non-negative");
                0
            }
            Ok(ms) => ms,
            Err(_) => {
                errors.add("retention", "invalid retention format");
                0
            }
        };

        errors.into_result(TopicConfig {
            name: original.name.clone(),
            partitions: partitions.unwrap_or(original.partitions),
            replication_factor: replication.unwrap_or(original.replication_factor),
            cleanup_policy: cleanup_from_label(fields.get("cleanup")),
            min_in_sync_replicas: min_isr.unwrap_or(original.min_in_sync_replicas),
            retention_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_deck_core::types::CleanupPolicy;

    fn config() -> TopicConfig {
        TopicConfig {
            name: "orders".into(),
            partitions: 3,
            replication_factor: 2,
            cleanup_policy: CleanupPolicy::Compact,
            min_in_sync_replicas: 1,
            retention_ms: 7 * MILLIS_PER_DAY,
        }
    }

    #[test]
    fn unchanged_editor_round_trips_config() {
        let mut editor = TopicConfigEditor::edit(&config());
        assert_eq!(editor.fields().get("retention"), "7d");
        assert_eq!(editor.submit().unwrap(), config());
    }

    #[test]
    fn infinite_retention_round_trips_as_empty() {
        let infinite = TopicConfig {
            retention_ms: INFINITE_RETENTION,
            ..config()
        };
        let mut editor = TopicConfigEditor::edit(&infinite);
        assert_eq!(editor.fields().get("retention"), "");
        assert_eq!(editor.submit().unwrap(), infinite);
    }

    #[test]
    fn cleared_retention_submits_infinite() {
        let fields = FormFields::new()
            .with("partitions", "3")
            .with("replication", "2")
            .with("cleanup", "Delete")
            .with("minsync", "1")
            .with("retention", "  ");
        let edited = TopicConfigStep::validate(&fields, &config()).unwrap();
        assert_eq!(edited.retention_ms, INFINITE_RETENTION);
    }

    #[test]
    fn per_field_errors() {
        let mut editor = TopicConfigEditor::edit(&config());
        editor.backspace();
        editor.input('0');
        assert!(!editor.prev_step());

        let fields = editor
            .fields()
            .clone()
            .with("minsync", "5")
            .with("retention", "-1h");
        let errors = TopicConfigStep::validate(&fields, &config()).unwrap_err();
        assert_eq!(errors.get("partitions"), Some("must be at least 1"));
        assert_eq!(errors.get("minsync"), Some("cannot exceed replication factor"));
        assert_eq!(errors.get("retention"), Some("must be non-negative"));
        assert!(errors.get("replication").is_none());
    }

    #[test]
    fn cleanup_choice_cycles() {
        let mut editor = TopicConfigEditor::edit(&config());
        editor.next_step();
        editor.next_step();
        assert_eq!(editor.step(), TopicConfigStep::Cleanup);
        editor.cycle(true);
        assert_eq!(editor.submit().unwrap().cleanup_policy, CleanupPolicy::CompactDelete);
    }
}

//! Schema detail pane

use std::sync::{Arc, PoisonError, RwLock};

use kafka_deck_core::types::SchemaEntry;

use super::PanelViewModel;
use crate::model::command::CommandBinding;
use crate::model::notifier::{ChangeField, ChangeHandler, Notifier};

#[derive(Default)]
pub struct SchemaRegistryDetailViewModel {
    schema: RwLock<Option<SchemaEntry>>,
    notifier: Notifier,
}

impl SchemaRegistryDetailViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_schema(&self, schema: Option<SchemaEntry>) {
        *self.schema.write().unwrap_or_else(PoisonError::into_inner) = schema;
        self.notifier.notify(ChangeField::Items);
    }

    pub fn schema(&self) -> Option<SchemaEntry> {
        self.schema
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Schema text, re-indented when it parses as JSON.
    pub fn schema_content(&self) -> String {
        let Some(entry) = self.schema() else {
            return String::new();
        };
        serde_json::from_str::<serde_json::Value>(&entry.schema)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or(entry.schema)
    }
}

impl PanelViewModel for SchemaRegistryDetailViewModel {
    fn title(&self) -> String {
        self.schema().map_or_else(
            || "Schema".to_string(),
            |s| format!("{} v{} [{}]", s.subject, s.version, s.schema_type),
        )
    }

    fn display_rows(&self) -> Vec<String> {
        if self.schema().is_none() {
            return vec!["No schema selected".to_string()];
        }
        self.schema_content().lines().map(str::to_string).collect()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_schemas_are_pretty_printed() {
        let vm = SchemaRegistryDetailViewModel::new();
        vm.set_schema(Some(SchemaEntry {
            subject: "users-value".into(),
            version: 5,
            schema_type: "JSON".into(),
            schema: r#"{"type":"object"}"#.into(),
        }));
        assert_eq!(vm.title(), "users-value v5 [JSON]");
        assert_eq!(vm.display_rows(), vec!["{", "  \"type\": \"object\"", "}"]);
    }

    #[test]
    fn non_json_schemas_are_shown_verbatim() {
        let vm = SchemaRegistryDetailViewModel::new();
        vm.set_schema(Some(SchemaEntry {
            subject: "p".into(),
            version: 1,
            schema_type: "PROTOBUF".into(),
            schema: "syntax = \"proto3\";".into(),
        }));
        assert_eq!(vm.schema_content(), "syntax = \"proto3\";");
    }
}

//! Multi-step input forms
//!
//! A wizard is a [`Step`] enum plus a bag of string fields. Transitions are pure functions
//! of the current step and the field values, so branching (e.g. SASL credentials only when
//! SASL is chosen) is testable without any UI. [`Wizard::submit`] validates every field
//! at once and yields the typed payload only when nothing is wrong.
//!
//! ```text
//! Closed ──show──▶ Open(FIRST) ──next──▶ Open(..) ──next on terminal──▶ submit
//!                      ▲                    │                              │
//!                      └──────prev──────────┘                 errors: stay open
//! ```

mod add_broker;
mod add_topic;
mod confirm;
mod produce_message;
mod topic_config;
mod validation;

use std::collections::BTreeMap;
use std::fmt::Debug;

pub use add_broker::AddBrokerWizard;
pub use add_topic::AddTopicWizard;
pub use confirm::{ConfirmAction, ConfirmDialog};
pub use produce_message::{ProduceMessageForm, ProduceRequest};
pub use topic_config::TopicConfigEditor;
pub use validation::ValidationErrors;

/// Field values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<&'static str, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Raw value, empty when never set.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    pub fn trimmed(&self, field: &str) -> &str {
        self.get(field).trim()
    }

    pub fn set(&mut self, field: &'static str, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    fn entry(&mut self, field: &'static str) -> &mut String {
        self.0.entry(field).or_default()
    }
}

/// How the active field takes input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered masked
    Secret,
    /// Cycled with the arrow keys
    Choice(&'static [&'static str]),
}

/// Result of advancing from a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    Step(S),
    Submit,
}

pub trait Step: Copy + Eq + Debug + Send + 'static {
    type Output;
    /// Data the validator needs besides the fields
    type Context: Send + Debug;

    const FIRST: Self;

    fn next(self, fields: &FormFields) -> Transition<Self>;

    /// `None` on the first step.
    fn prev(self, fields: &FormFields) -> Option<Self>;

    /// Name of the field this step edits
    fn field(self) -> &'static str;

    fn label(self) -> &'static str;

    fn kind(self) -> FieldKind {
        FieldKind::Text
    }

    /// Collect every violation or build the payload.
    fn validate(fields: &FormFields, context: &Self::Context) -> Result<Self::Output, ValidationErrors>;
}

/// A form instance. Created on show, dropped on close.
#[derive(Debug)]
pub struct Wizard<S: Step> {
    title: String,
    step: S,
    fields: FormFields,
    errors: ValidationErrors,
    context: S::Context,
}

impl<S: Step> Wizard<S> {
    pub fn new(title: impl Into<String>, fields: FormFields, context: S::Context) -> Self {
        Self {
            title: title.into(),
            step: S::FIRST,
            fields,
            errors: ValidationErrors::new(),
            context,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub fn step(&self) -> S {
        self.step
    }

    #[cfg(test)]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Value of the active field
    pub fn value(&self) -> &str {
        self.fields.get(self.step.field())
    }

    /// Advance one step. Returns `true` without moving when the current step is terminal.
    pub fn next_step(&mut self) -> bool {
        match self.step.next(&self.fields) {
            Transition::Submit => true,
            Transition::Step(next) => {
                self.step = next;
                false
            }
        }
    }

    /// Go back one step. Returns `false` on the first step.
    pub fn prev_step(&mut self) -> bool {
        match self.step.prev(&self.fields) {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    pub fn input(&mut self, ch: char) {
        if matches!(self.step.kind(), FieldKind::Choice(_)) {
            return;
        }
        self.fields.entry(self.step.field()).push(ch);
    }

    pub fn backspace(&mut self) {
        if matches!(self.step.kind(), FieldKind::Choice(_)) {
            return;
        }
        self.fields.entry(self.step.field()).pop();
    }

    /// Rotate a choice field through its options.
    pub fn cycle(&mut self, forward: bool) {
        let FieldKind::Choice(options) = self.step.kind() else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == self.value()).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.fields.set(self.step.field(), options[next]);
    }

    /// Validate everything. On failure the errors are kept for display and the
    /// wizard stays on its current step.
    pub fn submit(&mut self) -> Result<S::Output, ValidationErrors> {
        match S::validate(&self.fields, &self.context) {
            Ok(output) => {
                self.errors = ValidationErrors::new();
                Ok(output)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

/// Type-erased surface of a [`Wizard`] used by key handling and rendering
pub trait Form {
    fn title(&self) -> &str;
    fn label(&self) -> &'static str;
    fn value(&self) -> &str;
    fn kind(&self) -> FieldKind;
    fn errors(&self) -> &ValidationErrors;
    /// `(label, value, kind)` of every field visited so far, current one last
    fn history(&self) -> Vec<(&'static str, &str, FieldKind)>;
    fn next_step(&mut self) -> bool;
    fn prev_step(&mut self) -> bool;
    fn input(&mut self, ch: char);
    fn backspace(&mut self);
    fn cycle(&mut self, forward: bool);
}

impl<S: Step> Form for Wizard<S> {
    fn title(&self) -> &str {
        Wizard::title(self)
    }

    fn label(&self) -> &'static str {
        self.step.label()
    }

    fn value(&self) -> &str {
        Wizard::value(self)
    }

    fn kind(&self) -> FieldKind {
        self.step.kind()
    }

    fn errors(&self) -> &ValidationErrors {
        Wizard::errors(self)
    }

    fn history(&self) -> Vec<(&'static str, &str, FieldKind)> {
        let mut steps = vec![self.step];
        let mut cursor = self.step;
        while let Some(prev) = cursor.prev(&self.fields) {
            steps.push(prev);
            cursor = prev;
        }
        steps
            .into_iter()
            .rev()
            .map(|s| (s.label(), self.fields.get(s.field()), s.kind()))
            .collect()
    }

    fn next_step(&mut self) -> bool {
        Wizard::next_step(self)
    }

    fn prev_step(&mut self) -> bool {
        Wizard::prev_step(self)
    }

    fn input(&mut self, ch: char) {
        Wizard::input(self, ch);
    }

    fn backspace(&mut self) {
        Wizard::backspace(self);
    }

    fn cycle(&mut self, forward: bool) {
        Wizard::cycle(self, forward);
    }
}

/// Parse a strictly positive integer field.
pub(crate) fn positive_int(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|n| *n > 0)
}

//! Key-bound commands

use crate::error::UiResult;
use crate::event::KeyBinding;

type Action = Box<dyn Fn() -> UiResult<()> + Send + Sync>;
type Hook = Box<dyn Fn() + Send + Sync>;

/// A zero-argument fallible action plus an optional completion hook
///
/// The hook runs only when the action succeeds.
pub struct Command {
    action: Action,
    on_completed: Option<Hook>,
}

impl Command {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() -> UiResult<()> + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
            on_completed: None,
        }
    }

    #[must_use]
    pub fn with_on_completed<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_completed = Some(Box::new(hook));
        self
    }

    pub fn execute(&self) -> UiResult<()> {
        (self.action)()?;
        if let Some(hook) = &self.on_completed {
            hook();
        }
        Ok(())
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("has_on_completed", &self.on_completed.is_some())
            .finish_non_exhaustive()
    }
}

/// Key → command entry exposed by a view model
#[derive(Debug)]
pub struct CommandBinding {
    pub key: KeyBinding,
    /// Short label for the hint bar
    pub name: &'static str,
    pub command: Command,
}

impl CommandBinding {
    pub fn new(key: KeyBinding, name: &'static str, command: Command) -> Self {
        Self { key, name, command }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn hook_runs_after_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let cmd = Command::new(|| Ok(())).with_on_completed(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        tokio_test::assert_ok!(cmd.execute());
        tokio_test::assert_ok!(cmd.execute());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn hook_suppressed_on_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let cmd = Command::new(|| Err(UiError::NoSelection)).with_on_completed(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let err = tokio_test::assert_err!(cmd.execute());
        assert!(matches!(err, UiError::NoSelection));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

//! Change notification primitives

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// What changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeField {
    Items,
    SelectedIndex,
    Custom(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub field: ChangeField,
}

pub type ChangeHandler = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Single-subscriber change signal
///
/// Registering a handler replaces the previous one.
#[derive(Default)]
pub struct Notifier {
    handler: RwLock<Option<ChangeHandler>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F>(&self, handler: F)
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    /// Fire-and-forget. The handler runs after the lock is released.
    pub fn notify(&self, field: ChangeField) {
        let handler = self
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler(ChangeEvent { field });
        }
    }
}

/// Drop-latest redraw signal shared by every view model
///
/// Any number of notifications between two frames collapse into one redraw.
#[derive(Debug, Clone)]
pub struct RedrawFlag(Arc<AtomicBool>);

impl RedrawFlag {
    /// Starts dirty so the first frame is drawn.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns whether a redraw was requested and clears the request.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Handler suitable for [`Notifier::on_change`].
    pub fn handler(&self) -> impl Fn(ChangeEvent) + Send + Sync + 'static {
        let flag = self.clone();
        move |_| flag.mark()
    }
}

impl Default for RedrawFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn last_handler_wins() {
        let notifier = Notifier::new();
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));

        let f = Arc::clone(&first);
        notifier.on_change(move |_| *f.lock().unwrap() += 1);
        let s = Arc::clone(&second);
        notifier.on_change(move |_| *s.lock().unwrap() += 1);

        notifier.notify(ChangeField::Items);
        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn notify_without_handler_is_noop() {
        Notifier::new().notify(ChangeField::Custom("tab"));
    }

    #[test]
    fn redraw_flag_collapses_duplicates() {
        let flag = RedrawFlag::new();
        assert!(flag.take());
        assert!(!flag.take());

        let notifier = Notifier::new();
        notifier.on_change(flag.handler());
        notifier.notify(ChangeField::Items);
        notifier.notify(ChangeField::SelectedIndex);
        assert!(flag.take());
        assert!(!flag.take());
    }
}

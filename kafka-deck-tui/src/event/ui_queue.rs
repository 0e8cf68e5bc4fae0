//! UI update queue
//!
//! Background tasks never touch view-model rows directly. They hand a closure (or an
//! [`AppMessage`]) to a [`UiScheduler`]; the main loop drains the paired [`UiQueue`] once per
//! tick on the UI thread, in submission order.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::message::AppMessage;

type UiTask = Box<dyn FnOnce() + Send + 'static>;

enum UiUpdate {
    Run(UiTask),
    Message(AppMessage),
}

/// Cloneable handle for scheduling work on the UI thread
#[derive(Clone)]
pub struct UiScheduler {
    tx: UnboundedSender<UiUpdate>,
}

impl UiScheduler {
    /// Run `f` on the UI thread during the next drain.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The receiver only goes away at shutdown; late updates are dropped.
        if self.tx.send(UiUpdate::Run(Box::new(f))).is_err() {
            tracing::debug!("UI queue closed, update dropped");
        }
    }

    /// Deliver a message to the update layer during the next drain.
    pub fn send(&self, msg: AppMessage) {
        if self.tx.send(UiUpdate::Message(msg)).is_err() {
            tracing::debug!("UI queue closed, message dropped");
        }
    }
}

/// Receiving end, owned by the main loop
pub struct UiQueue {
    rx: UnboundedReceiver<UiUpdate>,
}

impl UiQueue {
    pub fn new() -> (UiScheduler, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (UiScheduler { tx }, Self { rx })
    }

    /// Run every pending closure on the calling thread and return queued messages.
    ///
    /// Closures and messages keep their relative submission order: messages come back
    /// in order and each closure has run before any message submitted after it is returned.
    pub fn drain(&mut self) -> Vec<AppMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(UiUpdate::Run(task)) => task(),
                Ok(UiUpdate::Message(msg)) => messages.push(msg),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn drains_in_submission_order() {
        let (scheduler, mut queue) = UiQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let seen = Arc::clone(&seen);
            scheduler.update(move || seen.lock().unwrap().push(i));
        }
        assert!(queue.drain().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn updates_from_worker_tasks_run_on_drain() {
        let (scheduler, mut queue) = UiQueue::new();
        let hits = Arc::new(Mutex::new(0));
        let h = Arc::clone(&hits);
        tokio::spawn(async move {
            scheduler.update(move || *h.lock().unwrap() += 1);
            scheduler.send(AppMessage::Quit);
        })
        .await
        .unwrap();

        assert_eq!(*hits.lock().unwrap(), 0);
        let messages = queue.drain();
        assert_eq!(*hits.lock().unwrap(), 1);
        assert!(matches!(messages.as_slice(), [AppMessage::Quit]));
    }

    #[test]
    fn empty_drain_is_noop() {
        let (_scheduler, mut queue) = UiQueue::new();
        assert!(queue.drain().is_empty());
    }
}

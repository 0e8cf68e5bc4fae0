//! Shared capabilities injected into view models

use std::sync::{Arc, PoisonError, RwLock};

use kafka_deck_core::ClusterClient;
use tokio::runtime::Handle;

use crate::error::{ErrorSink, UiError};
use crate::event::UiScheduler;

/// What a view model needs to run background work
#[derive(Clone)]
pub struct ViewContext {
    /// Marshals results back onto the UI thread
    pub scheduler: UiScheduler,
    /// Runtime that background loads are spawned on
    pub runtime: Handle,
    pub errors: ErrorSink,
}

impl ViewContext {
    pub fn new(scheduler: UiScheduler, runtime: Handle, errors: ErrorSink) -> Self {
        Self {
            scheduler,
            runtime,
            errors,
        }
    }

    /// Log and forward to the error sink.
    pub fn report(&self, context: &str, err: UiError) {
        err.log(context);
        (self.errors)(err);
    }
}

/// Injected cluster handle, read at call time
#[derive(Default)]
pub struct ClientSlot(RwLock<Option<Arc<dyn ClusterClient>>>);

impl ClientSlot {
    pub fn get(&self) -> Option<Arc<dyn ClusterClient>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, client: Option<Arc<dyn ClusterClient>>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = client;
    }

    /// Whether `client` is still the injected handle.
    pub fn holds(&self, client: &Arc<dyn ClusterClient>) -> bool {
        self.get().is_some_and(|current| Arc::ptr_eq(&current, client))
    }
}

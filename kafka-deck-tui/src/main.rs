//! Kafka Deck TUI
//!
//! ## Architecture
//!
//! Elm Architecture (TEA) on top of reactive view models:
//! - **Model**: view models, popup manager, app state (`model/`)
//! - **Message**: event messages (`message/`)
//! - **Update**: state transitions (`update/`)
//! - **View**: ratatui rendering (`view/`)
//! - **Event**: input handling and the UI update queue (`event/`)
//! - **Backend**: profile file, keyring, config, demo cluster (`backend/`)
//!
//! Startup order: config, logging, runtime, view models, initial load, terminal.
//! The terminal is restored whether or not the main loop failed.

mod app;
mod backend;
mod error;
mod event;
mod message;
mod model;
mod update;
mod util;
mod view;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kafka_deck_core::ClientFactory;

use backend::{
    ConfigService, DemoClientFactory, JsonBrokerProfileRepository, KeyringCredentialStore,
    LocalConfigService,
};
use error::{ErrorSink, UiError};
use event::UiQueue;
use message::AppMessage;
use model::context::ViewContext;
use model::{App, MainViewModel, Services};
use util::{init_logging, init_terminal, restore_terminal};

/// Simulated round trip of the demo cluster
const DEMO_LATENCY: Duration = Duration::from_millis(120);

fn main() -> Result<()> {
    let config = LocalConfigService::new().load()?;
    let _log_guard = init_logging(&backend::config_dir(), &config.log_filter())?;
    view::theme::set_theme(config.theme);
    tracing::info!(?config, "Starting Kafka Deck");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("kafka-deck-worker")
        .build()
        .context("building tokio runtime")?;

    let (scheduler, mut queue) = UiQueue::new();
    let errors: ErrorSink = {
        let scheduler = scheduler.clone();
        Arc::new(move |e: UiError| scheduler.send(AppMessage::ReportError(e.to_string())))
    };
    let ctx = ViewContext::new(scheduler, runtime.handle().clone(), errors);

    let factory: Arc<dyn ClientFactory> = if config.demo_cluster {
        Arc::new(DemoClientFactory::new().with_latency(DEMO_LATENCY))
    } else {
        tracing::warn!("Demo cluster disabled and no broker transport is built in; connections will fail");
        Arc::new(DemoClientFactory::unreachable())
    };
    let profiles = Arc::new(JsonBrokerProfileRepository::new());
    let profiles_path = profiles.path().to_path_buf();
    let services = Services {
        factory,
        profiles,
        credentials: Arc::new(KeyringCredentialStore::new()),
    };

    let main_vm = MainViewModel::new(ctx, services, config.message_limit);
    let mut app = App::new(Arc::clone(&main_vm));
    let _initial_load = main_vm.load_initial_data();

    let mut terminal = init_terminal()?;
    let result = app::run(
        &mut terminal,
        &mut app,
        &mut queue,
        config.tick_rate(),
        &profiles_path,
    );
    restore_terminal(&mut terminal)?;

    if let Some(client) = main_vm.active_client() {
        client.close();
    }
    runtime.shutdown_timeout(Duration::from_millis(500));
    tracing::info!("Kafka Deck stopped");

    result
}

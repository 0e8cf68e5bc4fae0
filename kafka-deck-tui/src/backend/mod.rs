//! Backend layer: concrete collaborators behind the core traits
//!
//! ```text
//!     MainViewModel ──▶ Services { factory, profiles, credentials }
//!                              │         │           │
//!                              ▼         ▼           ▼
//!                     DemoClientFactory  │   KeyringCredentialStore
//!                                        ▼
//!                           JsonBrokerProfileRepository
//! ```
//!
//! - `profile_repository`  broker profiles in `<config dir>/kafka-deck/brokers.json`
//! - `credential_service`  SASL credentials in the system keyring
//! - `config_service`      `AppConfig` loaded from `<config dir>/kafka-deck/config.json`
//! - `demo_cluster`        in-memory cluster so the dashboard runs without a broker
//!
//! Nothing here knows about the UI. View models only see the core traits.

mod config_service;
mod credential_service;
mod demo_cluster;
mod profile_repository;

use std::path::PathBuf;

pub use config_service::{ConfigService, LocalConfigService};
pub use credential_service::KeyringCredentialStore;
pub use demo_cluster::DemoClientFactory;
pub use profile_repository::JsonBrokerProfileRepository;

/// `<platform config dir>/kafka-deck`, or `./kafka-deck` when the platform has none.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kafka-deck")
}

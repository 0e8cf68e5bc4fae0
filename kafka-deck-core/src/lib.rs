//! Kafka Deck Core Library
//!
//! Platform-independent building blocks for the Kafka Deck dashboard:
//! - Domain types (brokers, topics, partitions, consumer groups, messages, schemas)
//! - Collaborator traits (cluster client, client factory, profile repository, credential store)
//! - Unified error type
//!
//! The wire protocol lives behind [`ClusterClient`]; this crate never talks to a broker itself.

pub mod error;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use traits::{BrokerProfileRepository, ClientFactory, ClusterClient, CredentialStore, Credentials};

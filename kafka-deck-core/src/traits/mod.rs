//! Collaborator trait definitions

mod cluster_client;
mod credential_store;
mod profile_repository;

pub use cluster_client::{ClientFactory, ClusterClient};
pub use credential_store::{CredentialStore, Credentials};
pub use profile_repository::BrokerProfileRepository;

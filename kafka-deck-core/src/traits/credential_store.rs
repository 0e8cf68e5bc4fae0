//! Credential storage abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// SASL username/password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Credential store trait, keyed by broker profile name
///
/// Platform implementation: `KeyringCredentialStore` (keyring crate) in the terminal UI.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save_credentials(&self, broker: &str, credentials: &Credentials) -> CoreResult<()>;

    /// # Returns
    /// * `Ok(Some(credentials))` - stored
    /// * `Ok(None)` - nothing stored for this broker
    async fn get_credentials(&self, broker: &str) -> CoreResult<Option<Credentials>>;

    async fn delete_credentials(&self, broker: &str) -> CoreResult<()>;
}

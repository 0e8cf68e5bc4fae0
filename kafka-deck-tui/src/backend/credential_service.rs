//! Credential storage service
//!
//! SASL credentials live in the system keychain, one entry per broker profile:
//! - Windows: Credential Manager
//! - macOS: Keychain
//! - Linux: Secret Service (GNOME Keyring / KWallet)

use async_trait::async_trait;
use kafka_deck_core::traits::{CredentialStore, Credentials};
use kafka_deck_core::{CoreError, CoreResult};
use keyring::Entry;

const SERVICE_NAME: &str = "kafka-deck";

/// Keychain backed credential store
///
/// Each entry holds `{"username": .., "password": ..}` under the broker name.
#[derive(Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(broker: &str) -> CoreResult<Entry> {
        Entry::new(SERVICE_NAME, broker)
            .map_err(|e| CoreError::CredentialError(format!("Failed to create entry: {e}")))
    }

    fn read_sync(broker: &str) -> CoreResult<Option<Credentials>> {
        let json = match Self::entry(broker)?.get_password() {
            Ok(json) => json,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(CoreError::CredentialError(format!("Failed to load: {e}"))),
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| CoreError::CredentialError(format!("Failed to deserialize: {e}")))
    }

    fn write_sync(broker: &str, credentials: &Credentials) -> CoreResult<()> {
        let json = serde_json::to_string(credentials)
            .map_err(|e| CoreError::CredentialError(format!("Failed to serialize: {e}")))?;

        Self::entry(broker)?
            .set_password(&json)
            .map_err(|e| CoreError::CredentialError(format!("Failed to save: {e}")))
    }

    fn delete_sync(broker: &str) -> CoreResult<()> {
        match Self::entry(broker)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::CredentialError(format!("Failed to delete: {e}"))),
        }
    }
}

/// Keychain calls block; run them off the async workers.
async fn blocking<T, F>(f: F) -> CoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> CoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::CredentialError(format!("Task join error: {e}")))?
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn save_credentials(&self, broker: &str, credentials: &Credentials) -> CoreResult<()> {
        let broker = broker.to_string();
        let credentials = credentials.clone();
        tracing::debug!(broker = %broker, "Saving credentials to keyring");
        blocking(move || Self::write_sync(&broker, &credentials)).await
    }

    async fn get_credentials(&self, broker: &str) -> CoreResult<Option<Credentials>> {
        let broker = broker.to_string();
        blocking(move || Self::read_sync(&broker)).await
    }

    async fn delete_credentials(&self, broker: &str) -> CoreResult<()> {
        let broker = broker.to_string();
        tracing::debug!(broker = %broker, "Deleting credentials from keyring");
        blocking(move || Self::delete_sync(&broker)).await
    }
}

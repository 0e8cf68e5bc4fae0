//! Broker profile persistence abstraction

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::BrokerProfile;

/// Broker profile repository trait
///
/// Implementations persist the whole list at once; passwords are never written here
/// (see [`crate::CredentialStore`]).
#[async_trait]
pub trait BrokerProfileRepository: Send + Sync {
    /// Load all profiles. A missing store yields an empty list.
    async fn load(&self) -> CoreResult<Vec<BrokerProfile>>;

    /// Replace the stored list.
    async fn save(&self, profiles: &[BrokerProfile]) -> CoreResult<()>;
}

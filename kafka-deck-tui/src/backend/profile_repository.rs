//! Broker profile repository
//!
//! Stores the profile list as pretty JSON. Passwords never reach the file: the
//! `password` field is skipped by serde and lives in the keyring.
//!
//! Every load reads the file, since the user may edit it in an external editor.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kafka_deck_core::traits::BrokerProfileRepository;
use kafka_deck_core::types::BrokerProfile;
use kafka_deck_core::{CoreError, CoreResult};
use tokio::fs;
use tokio::sync::Mutex;

use super::config_dir;

const PROFILES_FILE: &str = "brokers.json";

/// JSON file backed profile repository
pub struct JsonBrokerProfileRepository {
    path: PathBuf,
    /// Serializes writers
    write_lock: Mutex<()>,
}

impl JsonBrokerProfileRepository {
    pub fn new() -> Self {
        Self::with_path(config_dir().join(PROFILES_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> CoreResult<Vec<BrokerProfile>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::StorageError(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    async fn write_file(&self, profiles: &[BrokerProfile]) -> CoreResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(profiles)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))
    }
}

impl Default for JsonBrokerProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerProfileRepository for JsonBrokerProfileRepository {
    async fn load(&self) -> CoreResult<Vec<BrokerProfile>> {
        let profiles = self.read_file().await?;
        tracing::debug!(count = profiles.len(), path = %self.path.display(), "Loaded broker profiles");
        Ok(profiles)
    }

    async fn save(&self, profiles: &[BrokerProfile]) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_file(profiles).await?;
        tracing::debug!(count = profiles.len(), "Saved broker profiles");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_deck_core::types::SaslMechanism;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBrokerProfileRepository::with_path(dir.path().join("brokers.json"));
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("brokers.json");
        let profiles = vec![
            BrokerProfile::new("local", "localhost:9092"),
            BrokerProfile::new("prod", "kafka:9092").with_sasl(
                SaslMechanism::ScramSha256,
                "admin",
                "hunter2",
            ),
        ];

        JsonBrokerProfileRepository::with_path(&path)
            .save(&profiles)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("hunter2"));

        let loaded = JsonBrokerProfileRepository::with_path(&path).load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].username, "admin");
        assert!(loaded[1].password.is_empty());
    }

    #[tokio::test]
    async fn load_sees_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBrokerProfileRepository::with_path(dir.path().join("brokers.json"));
        repo.save(&[BrokerProfile::new("local", "localhost:9092")]).await.unwrap();
        assert_eq!(repo.load().await.unwrap().len(), 1);

        let edited = serde_json::to_string(&vec![
            BrokerProfile::new("local", "localhost:9092"),
            BrokerProfile::new("staging", "staging:9092"),
        ])
        .unwrap();
        std::fs::write(repo.path(), edited).unwrap();

        let names: Vec<_> = repo.load().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["local".to_string(), "staging".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brokers.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonBrokerProfileRepository::with_path(&path).load().await.unwrap_err();
        assert!(matches!(err, CoreError::SerializationError(_)));
    }
}

//! Single-file key-value persistence for client side state. One fixed key
//! is in use today (the selected location); the store itself is a plain
//! string map so reads return present-or-absent and never error on absence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    /// Absence is not an error.
    async fn get_raw(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Overwrites the key wholesale.
    async fn put_raw(&self, key: &str, value: String) -> anyhow::Result<()>;

    /// Removes the key. Removing an absent key is a no-op.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// JSON-file-backed store. The whole map is rewritten on every put; writes
/// are rare and user initiated, so last-write-wins without locking is
/// acceptable here.
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(directory: &Path) -> Self {
        FilePreferences {
            path: directory.join("preferences.json"),
        }
    }

    async fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt preferences file at {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(entries).context("Failed to encode preferences")?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[async_trait]
impl KeyValueStore for FilePreferences {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_raw(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.load().await?;
        Ok(entries.get(key).cloned())
    }

    #[tracing::instrument(skip(self, value), level = "debug")]
    async fn put_raw(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_owned(), value);
        self.persist(&entries).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod memory {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::KeyValueStore;

    /// Map-backed store for tests and previews.
    #[derive(Default)]
    pub struct InMemoryPreferences {
        entries: Mutex<BTreeMap<String, String>>,
    }

    impl InMemoryPreferences {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl KeyValueStore for InMemoryPreferences {
        async fn get_raw(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put_raw(&self, key: &str, value: String) -> anyhow::Result<()> {
            self.entries.lock().unwrap().insert(key.to_owned(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// Every operation fails. Exercises the `Cache` folding paths.
    pub struct BrokenPreferences;

    #[async_trait]
    impl KeyValueStore for BrokenPreferences {
        async fn get_raw(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("preferences backend unavailable"))
        }

        async fn put_raw(&self, _key: &str, _value: String) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("preferences backend unavailable"))
        }

        async fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("preferences backend unavailable"))
        }
    }
}

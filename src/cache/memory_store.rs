use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::utils::errors::AppResult;

/// Almacén en memoria
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value = self.entries.read().await.get(key).cloned();
        debug!("📥 Store GET {} -> {}", key, if value.is_some() { "HIT" } else { "MISS" });
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        debug!("💾 Store SET {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        debug!("🗑️ Store DELETE {}", key);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        debug!("🧹 Store limpiado");
        Ok(())
    }
}

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::KeyValueStore;
use crate::utils::errors::{AppError, AppResult};

/// Almacén persistido como un objeto JSON en un fichero
///
/// Todo el contenido vive en memoria; cada escritura reescribe el fichero
/// completo a través de un temporal y un `rename`, así un corte a mitad
/// de escritura nunca deja el fichero a medias.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Abre (o crea vacío) el almacén en `path`
    pub async fn open(path: PathBuf) -> AppResult<Self> {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("⚠️ Sesión local ilegible en {}: {}. Se empieza vacía", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(AppError::Io(e)),
        };

        info!("💾 Sesión local abierta en {} ({} claves)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let serialized = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, serialized).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Store(format!("cannot replace {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await?;
        debug!("💾 Store SET {} ({})", key, self.path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await?;
        info!("🧹 Sesión local borrada ({})", self.path.display());
        Ok(())
    }
}

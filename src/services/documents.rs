use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors that can occur with document storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid document key: {0:?}")]
    InvalidKey(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A directory holding one JSON document per key
///
/// Keys are percent-encoded into file names. Writes go to a sibling temp
/// file which is then renamed over the target, so a reader never sees a
/// half-written document.
#[derive(Debug, Clone)]
pub struct DocumentDir {
    root: PathBuf,
}

impl DocumentDir {
    /// Open (and create if needed) a document directory
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(io_error(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a key
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", urlencoding::encode(key))))
    }

    /// Load every `*.json` document, skipping ones that fail to parse
    pub async fn load_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        let mut entries = fs::read_dir(&self.root).await.map_err(io_error(&self.root))?;
        let mut documents = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_error(&self.root))? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping unreadable document {}: {}", path.display(), e);
                    continue;
                }
            };

            match serde_json::from_slice::<T>(&bytes) {
                Ok(document) => documents.push(document),
                Err(e) => tracing::warn!("Skipping malformed document {}: {}", path.display(), e),
            }
        }

        Ok(documents)
    }

    /// Write a document atomically
    pub async fn write<T: Serialize>(&self, key: &str, document: &T) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(document)?;

        fs::write(&tmp_path, bytes).await.map_err(io_error(&tmp_path))?;
        fs::rename(&tmp_path, &path).await.map_err(io_error(&path))?;

        tracing::trace!("Wrote document {}", path.display());
        Ok(())
    }

    /// Remove a document; a missing file is not an error
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("brainwave-{}-{}", label, uuid::Uuid::new_v4()))
}

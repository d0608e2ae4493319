mod content_type;
mod local;

use std::{io, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

pub use content_type::content_type_for;
pub use local::LocalFileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flat namespace of stored files addressed by name.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;
    /// `Ok(None)` when nothing is stored under `name`.
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

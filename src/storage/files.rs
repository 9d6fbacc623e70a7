// src/storage/files.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::errors::{Result, StorageError};

/// Flat, name-addressed blob storage for uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes `data` under `filename`, replacing any earlier content.
    async fn save(&self, filename: &str, data: &[u8]) -> Result<()>;

    /// Reads the stored bytes, or `None` if nothing is stored under the name.
    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>>;
}

/// Rejects anything that could escape the storage directory.
pub fn validate_filename(filename: &str) -> Result<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidFilename(filename.to_owned()));
    }
    Ok(())
}

/// Stores each file as a plain file inside one directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !fs::try_exists(&root).await? {
            fs::create_dir_all(&root).await?;
            info!("Created storage directory {:?}", root);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(filename)?;
        fs::write(&path, data).await?;
        debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(filename)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// src/storage/root.rs
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use super::errors::{Result, StorageError};
use crate::core::crypto::Digest;

/// Keeps the uploader's root digest as a bare hex string in a text file.
#[derive(Debug, Clone)]
pub struct RootStore {
    path: PathBuf,
}

impl RootStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored root via a temp file and rename.
    pub async fn save(&self, root: &Digest) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, root.as_str()).await?;
        fs::rename(&tmp, &self.path).await?;
        info!("Stored root hash {} at {:?}", root, self.path);
        Ok(())
    }

    pub async fn load(&self) -> Result<Digest> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Digest::parse(text.trim_end_matches(['\r', '\n']))?)
    }
}

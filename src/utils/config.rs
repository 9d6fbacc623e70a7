use std::path::{Path, PathBuf};

use config::{builder::DefaultState, Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::utils::error::{Result, VaultError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    pub root_hash_path: String,
    pub download_dir: String,
}

impl Config {
    /// Defaults, then `config/default` and `config/local` if present, then
    /// `MERKLE_VAULT__SECTION__KEY` environment variables.
    pub fn new() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));
        Self::build(builder)
    }

    /// Like [`Config::new`] but reads one explicit file, which must exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_str().ok_or_else(|| {
            VaultError::Config(format!("Non UTF-8 config path: {:?}", path.as_ref()))
        })?;
        Self::build(Self::defaults()?.add_source(File::with_name(path)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(ConfigLib::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.log_level", "info")?
            .set_default("server.max_upload_bytes", 10_485_760)? // 10MB
            .set_default("storage.upload_dir", "server_uploaded_files")?
            .set_default("client.server_url", "http://127.0.0.1:5000")?
            .set_default("client.root_hash_path", "root_hash.txt")?
            .set_default("client.download_dir", ".")?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .add_source(
                Environment::with_prefix("MERKLE_VAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(VaultError::Config("Invalid port number".into()));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(VaultError::Config("max_upload_bytes must be greater than 0".into()));
        }
        if self.storage.upload_dir.trim().is_empty() {
            return Err(VaultError::Config("upload_dir must be set".into()));
        }
        if self.client.root_hash_path.trim().is_empty() {
            return Err(VaultError::Config("root_hash_path must be set".into()));
        }
        if !(self.client.server_url.starts_with("http://")
            || self.client.server_url.starts_with("https://"))
        {
            return Err(VaultError::Config(format!(
                "server_url must be an http(s) URL, got {}",
                self.client.server_url
            )));
        }

        Ok(())
    }

    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.upload_dir)
    }

    pub fn root_hash_path(&self) -> PathBuf {
        PathBuf::from(&self.client.root_hash_path)
    }

    pub fn download_dir(&self) -> PathBuf {
        PathBuf::from(&self.client.download_dir)
    }
}

impl From<ConfigError> for VaultError {
    fn from(error: ConfigError) -> Self {
        VaultError::Config(error.to_string())
    }
}

// src/client/http.rs
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    api::types::{FileBundle, MessageResponse, RootResponse, UploadResponse},
    utils::error::{Result, VaultError},
};

/// Thin async wrapper over the server's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    base_url: String,
}

impl VaultClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("merkle-vault/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<UploadResponse> {
        debug!("POST /upload {} ({} bytes)", filename, data.len());
        let response = self
            .http
            .post(self.url("/upload"))
            .query(&[("filename", filename)])
            .body(data)
            .send()
            .await?;
        parse(response).await
    }

    /// A 200 body that does not decode as a bundle (for instance a digest
    /// altered in transit) is an integrity failure, not a transport one.
    pub async fn request_file(&self, filename: &str) -> Result<FileBundle> {
        debug!("GET /request_file {}", filename);
        let response = self
            .http
            .get(self.url("/request_file"))
            .query(&[("filename", filename)])
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        decode_bundle(&body)
    }

    pub async fn server_root(&self) -> Result<RootResponse> {
        let response = self.http.get(self.url("/root")).send().await?;
        parse(response).await
    }
}

fn decode_bundle(body: &[u8]) -> Result<FileBundle> {
    serde_json::from_slice(body)
        .map_err(|e| VaultError::Integrity(format!("Malformed file bundle: {}", e)))
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(check_status(response).await?.json::<T>().await?)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(VaultError::Server {
        status: status.as_u16(),
        message,
    })
}

//! HTTP client for the vault server.

pub mod commands;
pub mod http;

pub use commands::{upload_files, verify_file, UploadSummary, VerifyOutcome};
pub use http::VaultClient;

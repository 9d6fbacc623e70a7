// src/storage/mod.rs
mod errors;
pub mod files;
pub mod root;

pub use errors::{Result, StorageError};
pub use files::{validate_filename, FileStore, LocalFileStore};
pub use root::RootStore;

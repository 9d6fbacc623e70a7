pub mod vault;

pub use vault::{RootStatus, UploadReceipt, VaultService};

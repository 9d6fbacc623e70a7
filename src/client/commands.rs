// src/client/commands.rs
//! Upload and verify workflows behind the client binary.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, warn};

use super::http::VaultClient;
use crate::{
    core::{
        crypto::Digest,
        integrity::{check_bundle, leaf_digest, Verdict},
        merkle::MerkleTree,
    },
    storage::{validate_filename, RootStore},
    utils::error::{Result, VaultError},
};

#[derive(Debug)]
pub struct UploadSummary {
    /// Root of the batch, in the order given, as stored for verification.
    pub root: Digest,
    pub uploaded: Vec<(PathBuf, Digest)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct VerifyOutcome {
    pub verdict: Verdict,
    /// Where the file was written; only set when the verdict is intact.
    pub saved_to: Option<PathBuf>,
    /// Whether the server's current root equals the stored one, if the
    /// server could be asked.
    pub server_root_matches: Option<bool>,
}

fn filename_of(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VaultError::InvalidRequest(format!("Not a file path: {:?}", path)))?;
    validate_filename(name)?;
    Ok(name.to_owned())
}

/// Hashes every file, stores the root of the batch, then uploads each file.
///
/// A failed upload does not stop the batch; it is reported in the summary
/// and its local copy is never removed.
pub async fn upload_files(
    client: &VaultClient,
    paths: &[PathBuf],
    roots: &RootStore,
    remove_local: bool,
) -> Result<UploadSummary> {
    if paths.is_empty() {
        return Err(VaultError::InvalidRequest("No files to upload".into()));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = filename_of(path)?;
        let data = fs::read(path).await?;
        let digest = leaf_digest(&data);
        info!("Hashed {:?}: {}", path, digest);
        files.push((path.clone(), name, data, digest));
    }

    let tree = MerkleTree::from_leaves(files.iter().map(|(_, _, _, digest)| digest.clone()));
    let root = tree.root_digest()?.clone();
    roots.save(&root).await?;

    let mut summary = UploadSummary {
        root,
        uploaded: Vec::new(),
        failed: Vec::new(),
    };

    for (path, name, data, digest) in files {
        match client.upload(&name, data).await {
            Ok(response) if response.hash == digest => {
                info!(
                    leaf_index = response.leaf_index,
                    "Uploaded {:?} successfully at {}", path, response.uploaded_at
                );
                summary.uploaded.push((path, digest));
            }
            Ok(response) => {
                error!(
                    "Server stored {:?} with hash {} but local hash is {}",
                    path, response.hash, digest
                );
                summary.failed.push((path, format!("server hash {} differs", response.hash)));
            }
            Err(e) => {
                error!("Failed to upload {:?}: {}", path, e);
                summary.failed.push((path, e.to_string()));
            }
        }
    }

    if remove_local {
        remove_local_copies(&mut summary).await;
    }

    Ok(summary)
}

/// Deletes the local copy of every confirmed upload. A file that cannot be
/// deleted is reported in `failed` and the rest are still removed.
async fn remove_local_copies(summary: &mut UploadSummary) {
    for (path, _) in &summary.uploaded {
        match fs::remove_file(path).await {
            Ok(()) => info!("Deleted {:?} from local storage", path),
            Err(e) => {
                error!("Uploaded {:?} but could not delete it locally: {}", path, e);
                summary
                    .failed
                    .push((path.clone(), format!("uploaded, local copy not deleted: {}", e)));
            }
        }
    }
}

/// Fetches `filename` with its proof and checks it against the stored root.
///
/// The file is written into `download_dir` only when it verifies.
pub async fn verify_file(
    client: &VaultClient,
    filename: &str,
    roots: &RootStore,
    download_dir: &Path,
) -> Result<VerifyOutcome> {
    validate_filename(filename)?;
    let root = roots.load().await?;

    info!("Requesting file and proof from the server for {}", filename);
    let bundle = client.request_file(filename).await?;
    let data = bundle
        .decode_data()
        .map_err(|e| VaultError::Integrity(format!("Malformed file data: {}", e)))?;

    info!(
        file_hash = %bundle.file_hash,
        proof_len = bundle.proof.len(),
        stored_root = %root,
        "Verifying {}", filename
    );
    let verdict = check_bundle(&data, &bundle.file_hash, &bundle.proof, &root);

    let saved_to = if verdict.is_intact() {
        fs::create_dir_all(download_dir).await?;
        let path = download_dir.join(filename);
        fs::write(&path, &data).await?;
        info!("The file {} is verified and intact, saved to {:?}", filename, path);
        Some(path)
    } else {
        warn!("The file {} could not be verified: {:?}", filename, verdict);
        None
    };

    let server_root_matches = match client.server_root().await {
        Ok(status) => {
            let matches = status.root.as_ref() == Some(&root);
            if !matches {
                warn!(
                    server_root = ?status.root,
                    stored_root = %root,
                    "Server's current root differs from the stored root"
                );
            }
            Some(matches)
        }
        Err(e) => {
            warn!("Could not fetch server root: {}", e);
            None
        }
    };

    Ok(VerifyOutcome {
        verdict,
        saved_to,
        server_root_matches,
    })
}

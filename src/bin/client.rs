use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use merkle_vault::{
    client::{upload_files, verify_file, VaultClient},
    storage::RootStore,
    utils::{config::Config, error::VaultError, logging},
};

#[derive(Parser)]
#[command(name = "merkle-vault-client", version, about = "Upload files and verify them with Merkle proofs")]
struct Cli {
    /// Server base URL, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    server: Option<String>,

    /// File holding the stored root hash
    #[arg(long, global = true)]
    root_file: Option<PathBuf>,

    /// Configuration file to use instead of config/default and config/local
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files and store the root hash of the batch
    Upload {
        /// Paths of files to upload
        #[arg(required = true)]
        filepaths: Vec<PathBuf>,

        /// Delete each local file once the server has confirmed its hash
        #[arg(long)]
        remove_local: bool,
    },

    /// Download a file and verify it against the stored root hash
    Verify {
        /// Name of the file to verify
        filename: String,

        /// Directory to save the verified file into
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::new(),
    }
    .context("failed to load configuration")?;
    let _log_guard = logging::init("info", None)?;

    let server = cli.server.unwrap_or_else(|| config.client.server_url.clone());
    let roots = RootStore::new(cli.root_file.unwrap_or_else(|| config.root_hash_path()));
    let client = VaultClient::new(&server)?;

    match cli.command {
        Commands::Upload {
            filepaths,
            remove_local,
        } => {
            let summary = upload_files(&client, &filepaths, &roots, remove_local).await?;
            println!(
                "Uploaded {} of {} files. Root hash {} stored in {}",
                summary.uploaded.len(),
                filepaths.len(),
                summary.root,
                roots.path().display()
            );
            for (path, reason) in &summary.failed {
                println!("Failed to upload {}: {}", path.display(), reason);
            }
            Ok(if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Verify {
            filename,
            output_dir,
        } => {
            let download_dir = output_dir.unwrap_or_else(|| config.download_dir());
            let outcome = match verify_file(&client, &filename, &roots, &download_dir).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_not_found() => {
                    error!("Server has no verifiable copy of {}: {}", filename, e);
                    println!("The file {} was not found on the server.", filename);
                    return Ok(ExitCode::FAILURE);
                }
                Err(VaultError::Integrity(reason)) => {
                    error!("Bundle for {} failed integrity checks: {}", filename, reason);
                    println!("The file {} could not be verified: {}", filename, reason);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };

            if outcome.server_root_matches == Some(false) {
                println!("Note: the server's current root differs from the stored root.");
            }
            match outcome.saved_to {
                Some(path) => {
                    println!("The file {} is verified and intact ({}).", filename, path.display());
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("The file {} could not be verified: {:?}", filename, outcome.verdict);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

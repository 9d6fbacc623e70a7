// src/utils/logging.rs
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::error::{Result, VaultError};

const LOG_FILE_PREFIX: &str = "merkle-vault.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level`. When `log_dir` is given, events are
/// also written to a daily rolling file; keep the returned guard alive until
/// shutdown or buffered lines are lost.
pub fn init(default_level: &str, log_dir: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| VaultError::Config(format!("Invalid log level {:?}: {}", default_level, e)))?;

    let console = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| VaultError::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

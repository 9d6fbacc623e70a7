use merkle_vault::{utils::{config::Config, logging}, Application};
use tokio::signal;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::new()?;

    let _log_guard = logging::init(&config.server.log_level, config.server.log_dir.as_deref())?;

    info!("Starting Merkle Vault server v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config).await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    let server = app.start().map_err(|e| {
        error!("Failed to start application: {}", e);
        e
    })?;

    info!("Application started successfully");

    // Handle shutdown signals
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                error!("Failed to listen for shutdown signal: {}", err);
            }
        }
    });

    let server_task = actix_rt::spawn(server);

    let _ = shutdown_rx.await;
    app.shutdown().await;

    if let Err(e) = server_task.await? {
        error!("Server exited with error: {}", e);
    }

    info!("Application shutdown complete");
    Ok(())
}

use crate::config::Config;
use crate::detector::LabelDetector;
use crate::rekognition::RekognitionDetector;
use crate::server::HttpServer;

use std::{error::Error, sync::Arc};
use tokio::{signal, sync::broadcast};

pub async fn start_app(config: Config) -> Result<(), Box<dyn Error>> {
    let detector: Arc<dyn LabelDetector> =
        Arc::new(RekognitionDetector::new(&config.rekognition).await);

    let server = match HttpServer::new(detector, &config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to initialize http server: {:?}", e);
            return Err(e.into());
        }
    };

    let (shutdown_tx, _) = broadcast::channel(1);
    let server_handle = server.run(shutdown_tx.subscribe()).await?;

    shutdown_signal().await?;
    tracing::info!("Shutdown signal received, starting graceful shutdown.");

    let _ = shutdown_tx.send(());
    match server_handle.await {
        Ok(Ok(())) => tracing::info!("Server stopped"),
        Ok(Err(e)) => tracing::error!("Server exited with error: {:?}", e),
        Err(e) => tracing::error!("Server task failed: {:?}", e),
    }

    Ok(())
}

async fn shutdown_signal() -> std::io::Result<()> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

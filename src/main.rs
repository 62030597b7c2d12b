use clap::Parser;
use memory_match::{ServerConfig, WebsocketServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_match=info,server=info".into()),
        )
        .init();

    let config = ServerConfig::parse();
    tracing::info!("🎮 Starting memory match server on {}", config.bind);

    let server = WebsocketServer::new(config);
    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("received shutdown signal"),
    }

    tracing::info!("server stopped");
    Ok(())
}

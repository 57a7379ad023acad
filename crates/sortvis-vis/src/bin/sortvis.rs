//! SortVis Server
//!
//! Serve the sorting visualizer to a browser.

use sortvis_vis::{VisConfig, VisServer};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sortvis=info,sortvis_vis=info,sortvis_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;

    // Positional overrides: sortvis [size] [port]
    let args: Vec<String> = env::args().collect();
    if let Some(size) = args.get(1).and_then(|s| s.parse().ok()) {
        config = config.with_size(size);
    }
    if let Some(port) = args.get(2).and_then(|s| s.parse().ok()) {
        config = config.with_port(port);
    }

    tracing::info!(
        size = config.size,
        speed = %config.speed,
        seed = ?config.seed,
        "Starting sorting visualizer"
    );
    println!("Open http://localhost:{} in a browser.", config.addr.port());

    let server = VisServer::new(config).await?;
    server.serve().await?;

    Ok(())
}

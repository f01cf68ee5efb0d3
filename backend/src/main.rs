use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spendtrack_backend::{create_router, initialize_backend, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let state = initialize_backend(&config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("SpendTrack backend listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

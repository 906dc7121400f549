use courier_core::{logging, Config};
use courier_node::{router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init_with(&config.logging);

    let state = Arc::new(AppState::new(config.clone()).await?);
    info!(
        ca = %config.domain.ca_name,
        principals = ?config.domain.principals,
        "Trust domain ready"
    );

    let app = router(state);

    let bind_addr = config.listen_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Courier node listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

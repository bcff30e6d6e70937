use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{Level, info};

use shabdakosh::config::AppConfig;
use shabdakosh::state::AppState;
use shabdakosh::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::ensure_indexes(&db).await?;
    seed::seed_superadmin(&db, &config).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

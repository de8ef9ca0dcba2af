//! Activity Recognition Server - entry point

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use activity_server::{assets, config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "activity_server=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Initializing server ({})...", config.environment);

    // Assets are mandatory: never serve without them
    let assets = match assets::load(&config) {
        Ok(assets) => assets,
        Err(e) => {
            tracing::error!("Initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr();
    let app = create_router(AppState::new(assets, config));

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server ready at http://{}", addr);

    axum::serve(listener, app).await
        .context("server error")?;

    Ok(())
}

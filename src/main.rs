use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokerleague::{api, config::ServerConfig, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokerleague=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting poker league server...");

    let config = ServerConfig::from_env();
    tracing::info!(
        "Scanner: {:?} camera at {} fps, region {}x{}",
        config.scan.facing_mode,
        config.scan.scan_rate,
        config.scan.scan_region.width,
        config.scan.scan_region.height
    );
    if !config.enforce_game_day {
        tracing::warn!("Game-day check disabled, sign-in is open for every game");
    }
    if config.allow_simulated_scan {
        tracing::warn!("Simulated scans enabled");
    }

    let addr = config.bind_addr;
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState::new(config));

    let app = api::router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

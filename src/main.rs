//! Tattoo Studio backend server
//!
//! Serves the conversation history and generates tattoo designs.

use std::net::SocketAddr;
use std::sync::Arc;
use tattoo_studio::api::{cors_layer, create_router, AppState};
use tattoo_studio::config::ServerConfig;
use tattoo_studio::db::Database;
use tattoo_studio::imagegen::{ImageGenerator, LoggingImageGenerator, OpenAiImageService};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tattoo_studio=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    tracing::info!(turns = db.turn_count()?, "Turn log ready");

    let generator: Option<Arc<dyn ImageGenerator>> = match &config.openai_api_key {
        Some(key) => {
            let service = OpenAiImageService::new(
                key.clone(),
                config.image_model.clone(),
                config.image_size.clone(),
                &config.image_api_base,
            )?;
            tracing::info!(model = %config.image_model, size = %config.image_size, "Image generation enabled");
            Some(Arc::new(LoggingImageGenerator::new(service)) as Arc<dyn ImageGenerator>)
        }
        None => {
            tracing::warn!("No image API key configured. Set OPENAI_API_KEY to enable /api/generate.");
            None
        }
    };

    let state = AppState::new(db, generator);
    let app = create_router(state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(origins = ?config.allowed_origins, "Tattoo Studio server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

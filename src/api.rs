//! HTTP API for the tattoo backend

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::db::Database;
use crate::imagegen::ImageGenerator;
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// `None` when no image API key is configured
    pub generator: Option<Arc<dyn ImageGenerator>>,
}

impl AppState {
    pub fn new(db: Database, generator: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self { db, generator }
    }
}

/// CORS restricted to the given origins. Unparseable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

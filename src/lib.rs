//! HealthTrack records API: the record submission pipeline and its HTTP
//! surface.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod pipeline;

use config::Config;
use gateway::Backend;

#[derive(Clone)]
pub struct AppState {
    pub store: Backend,
    pub config: Arc<Config>,
}

pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        .route("/api/record-types", get(handlers::records::record_types))
        .route(
            "/api/records/:kind/form",
            get(handlers::records::form_template),
        )
        .route("/api/records/:kind", post(handlers::records::submit_record))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
        ])
        .allow_credentials(true)
}

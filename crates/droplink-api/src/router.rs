//! Route definitions for the Droplink HTTP API.
//!
//! Public access routes live under `/api/d` (direct codes) and `/api/s`
//! (link tokens); owner-facing management under `/api/files` and
//! `/api/links`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use droplink_core::config::server::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_size_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(access_routes())
        .merge(file_routes())
        .merge(link_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Public share access: check and download, by code or token.
fn access_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/d/{code}",
            get(handlers::access::check_code).post(handlers::access::check_code_with_password),
        )
        .route(
            "/d/{code}/download",
            get(handlers::access::download_by_code)
                .post(handlers::access::download_by_code_with_password),
        )
        .route(
            "/s/{token}",
            get(handlers::access::check_token).post(handlers::access::check_token_with_password),
        )
        .route(
            "/s/{token}/download",
            get(handlers::access::download_by_token)
                .post(handlers::access::download_by_token_with_password),
        )
}

/// Owner-facing file management.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(handlers::file::upload_file))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route(
            "/files/{id}/access",
            put(handlers::file::update_access_settings),
        )
        .route("/files/{id}/links", get(handlers::file::list_links))
        .route("/files/{id}/audit", get(handlers::file::download_history))
}

/// Share link issuance and revocation.
fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(handlers::link::create_link))
        .route("/links/{id}", delete(handlers::link::revoke_link))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Builds a CORS tower layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.contains(&"*".to_string()) {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    layer.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}

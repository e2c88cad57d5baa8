use axum::{
    http::{header, HeaderValue},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, frontend_dir: &str) -> Router {
    // UI files are never cached by the browser
    let frontend = Router::new()
        .fallback_service(
            ServeDir::new(frontend_dir)
                .fallback(ServeFile::new(format!("{}/index.html", frontend_dir))),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
        ));

    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Option tables and field visibility
        .route("/api/options", get(handlers::options::get_options))
        .route("/api/visibility", post(handlers::options::get_visibility))
        // Diagram routes
        .route("/api/diagrams/url", post(handlers::diagrams::diagram_url))
        .route("/api/diagrams/render", post(handlers::diagrams::render_diagram))
        .route("/api/diagrams/image", post(handlers::diagrams::diagram_image))
        // Reference data
        .route("/api/reference", get(handlers::reference::get_reference))
        .route("/api/reference/csizes", get(handlers::reference::list_csizes))
        // Advanced builder routes
        .route("/api/builders", post(handlers::builders::create_builder))
        .route("/api/builders/:id", get(handlers::builders::get_builder))
        .route("/api/builders/:id", delete(handlers::builders::delete_builder))
        .route("/api/builders/:id/settings", put(handlers::builders::update_settings))
        .route("/api/builders/:id/containers", post(handlers::builders::add_container))
        .route(
            "/api/builders/:id/containers/:index",
            delete(handlers::builders::remove_container),
        )
        .route(
            "/api/builders/:id/containers/:index/items",
            post(handlers::builders::add_item),
        )
        .route(
            "/api/builders/:id/containers/:index/items/:item",
            delete(handlers::builders::remove_item),
        )
        // WebSocket route
        .route("/api/ws", get(crate::ws::ws_handler))
        .with_state(state)
        // Static files (frontend)
        .merge(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// CORS for the dashboard editor, which may be served from another origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

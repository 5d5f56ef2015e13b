//! HTTP service for job sheets and final inspection reports.
//!
//! Both collections expose the same CRUD surface under `/api/<resource>`;
//! see [`routes::create_api_routes`].

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::{AppState, Resource};

use handlers::{detailed_health_check, health_check, metrics_handler};
use middleware::request_id_middleware;

pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
        .nest("/api", routes::create_api_routes());

    if state.config.monitoring.metrics_enabled {
        app = app.route("/metrics", get(metrics_handler));
    }

    let max_request_size = state.config.server.max_request_size;
    app
        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        // Application state
        .with_state(state)
}

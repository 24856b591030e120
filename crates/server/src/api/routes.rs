use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, provider};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Provider
        .route("/provider/status", get(provider::get_status))
        .route("/search", post(provider::search))
        .route("/propers", get(provider::find_propers))
        .route("/rss", get(provider::get_rss))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Room for multipart framing on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes(&state))
        .layer(
            // request_id_middleware runs first so the trace span can read the id
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: &AppState) -> Router<AppState> {
    // Oversized images must reach the handler to get the friendly size error
    let upload_limit = state.detection.max_upload_bytes * 2 + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // Catalog
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/:id", get(handlers::get_recipe))
        .route("/ingredients", get(handlers::list_ingredients))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        // Detection
        .route(
            "/ingredients/detect",
            post(handlers::detect).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

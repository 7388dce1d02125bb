use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::RecipeStore;
use crate::middleware::{propagate_request_id, trace_span_for};
use crate::services::{Explainer, Recommender};

pub mod explain;
pub mod ingredients;
pub mod ratings;
pub mod recipes;
pub mod recommend;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub recommender: Arc<Recommender>,
    pub explainer: Arc<Explainer>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(trace_span_for))
        .layer(middleware::from_fn(propagate_request_id))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ingredients", get(ingredients::list))
        .route("/ingredients/:id", get(ingredients::get_by_id))
        .route("/recipes", get(recipes::list))
        .route("/recipes/:id", get(recipes::get_by_id))
        .route("/recipes/:id/ratings", post(ratings::create))
        .route("/recommend", post(recommend::recommend))
        .route("/explain", post(explain::explain))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

use std::sync::Arc;

use axum::{
    routing::get,
    Json,
    Router,
};
use serde_json::{json, Value};

use consultation_cell::router::consultation_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic consultation API is running!" }))
        .route("/keepalive", get(keepalive))
        .nest("/api/AiConsultation", consultation_routes(state))
}

async fn keepalive() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}

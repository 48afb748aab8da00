use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::{consult, consultation_health, ConsultationHandlers};
use crate::services::ConsultationService;

/// Consultation routes backed by the upstream clients described in `state`.
pub fn consultation_routes(state: Arc<AppConfig>) -> Router {
    routes(Arc::new(ConsultationHandlers::new(state)))
}

/// Same routes around an already-built pipeline.
pub fn consultation_routes_with_service(
    state: Arc<AppConfig>,
    service: Arc<ConsultationService>,
) -> Router {
    routes(Arc::new(ConsultationHandlers::with_service(state, service)))
}

fn routes(handlers: Arc<ConsultationHandlers>) -> Router {
    Router::new()
        .route("/consult", post(consult))
        .route("/health", get(consultation_health))
        .with_state(handlers)
}

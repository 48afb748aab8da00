use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use reqwest::Client;
use tracing::{error, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ConsultationError, ConsultationHealth, ConsultationRequest, ConsultationResponse};
use crate::services::{validator::validate_request, ConsultationService};

pub struct ConsultationHandlers {
    config: Arc<AppConfig>,
    service: Result<Arc<ConsultationService>, ConsultationError>,
}

impl ConsultationHandlers {
    /// Builds the pipeline once. An incomplete configuration is kept as an
    /// error and reported on every request instead of panicking here.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let service = ConsultationService::from_config(&config, Client::new()).map(Arc::new);
        if let Err(e) = &service {
            warn!("AI consultation disabled: {}", e);
        }

        Self { config, service }
    }

    pub fn with_service(config: Arc<AppConfig>, service: Arc<ConsultationService>) -> Self {
        Self {
            config,
            service: Ok(service),
        }
    }

    fn service(&self) -> Result<&ConsultationService, AppError> {
        self.service
            .as_deref()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }
}

// ==============================================================================
// CONSULTATION HANDLERS
// ==============================================================================

/// POST /consult
#[axum::debug_handler]
pub async fn consult(
    State(handlers): State<Arc<ConsultationHandlers>>,
    payload: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<ConsultationResponse>, AppError> {
    let Json(request) = payload
        .map_err(|rejection| AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text())))?;

    // Input errors take precedence over configuration errors.
    validate_request(&request)?;
    let service = handlers.service()?;

    let response = service.consult(&request).await.map_err(|e| {
        error!("Error in /consult: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(response))
}

/// GET /health
pub async fn consultation_health(
    State(handlers): State<Arc<ConsultationHandlers>>,
) -> Json<ConsultationHealth> {
    let configured = handlers.service.is_ok();

    Json(ConsultationHealth {
        status: if configured { "healthy" } else { "not_configured" }.to_string(),
        configured,
        model: handlers.config.gemini_model.clone(),
        language: handlers.config.tts_language.clone(),
        missing: handlers
            .config
            .consultation_config_errors()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

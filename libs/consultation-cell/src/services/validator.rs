use shared_config::AppConfig;

use crate::models::{ConsultationError, ConsultationRequest};

/// Returns the prompt exactly as sent. Absent, empty and whitespace-only
/// prompts are rejected.
pub fn validate_request(request: &ConsultationRequest) -> Result<&str, ConsultationError> {
    match request.prompt.as_deref() {
        Some(prompt) if !prompt.trim().is_empty() => Ok(prompt),
        _ => Err(ConsultationError::MissingPrompt),
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConsultationError> {
    let missing = config.consultation_config_errors();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConsultationError::NotConfigured {
            missing: missing.join(", "),
        })
    }
}

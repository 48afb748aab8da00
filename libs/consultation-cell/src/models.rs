use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

// ==============================================================================
// REQUEST / RESPONSE
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ConsultationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub reply_text: String,
    pub audio_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationHealth {
    pub status: String,
    pub configured: bool,
    pub model: String,
    pub language: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing: Vec<String>,
}

// ==============================================================================
// PIPELINE VALUES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
}

/// One chunk of reply text and the URL that speaks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRequest {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    pub index: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOptions {
    pub host: String,
    pub language: String,
    pub slow: bool,
    pub max_segment_chars: usize,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum ConsultationError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Consultation service not configured: missing {missing}")]
    NotConfigured { missing: String },

    #[error("Composed prompt is empty")]
    EmptyComposedPrompt,

    #[error("Language model transport error: {0}")]
    LanguageModelTransport(String),

    #[error("Language model call timed out after {timeout_secs}s")]
    LanguageModelTimeout { timeout_secs: u64 },

    #[error("Language model returned HTTP {status}: {detail}")]
    LanguageModelStatus { status: u16, detail: String },

    #[error("Language model response could not be parsed: {0}")]
    InvalidModelResponse(String),

    #[error("No reply from language model")]
    EmptyModelReply,

    #[error("Reply text cannot be split for speech: {0}")]
    SegmentPlanning(String),

    #[error("Speech segment {} of {total} transport error: {message}", .index + 1)]
    SpeechTransport {
        index: usize,
        total: usize,
        message: String,
    },

    #[error("Speech segment {} of {total} timed out after {timeout_secs}s", .index + 1)]
    SpeechTimeout {
        index: usize,
        total: usize,
        timeout_secs: u64,
    },

    #[error("Speech segment {} of {total} failed with HTTP {status}", .index + 1)]
    SpeechSegmentStatus {
        index: usize,
        total: usize,
        status: u16,
    },

    #[error("Speech segment {} of {total} returned no audio", .index + 1)]
    EmptySegment { index: usize, total: usize },

    #[error("Speech segment {} was never fetched", .index + 1)]
    MissingSegment { index: usize },
}

impl ConsultationError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ConsultationError::MissingPrompt)
    }

    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            ConsultationError::LanguageModelTransport(_)
                | ConsultationError::LanguageModelTimeout { .. }
                | ConsultationError::LanguageModelStatus { .. }
                | ConsultationError::InvalidModelResponse(_)
                | ConsultationError::EmptyModelReply
                | ConsultationError::SpeechTransport { .. }
                | ConsultationError::SpeechTimeout { .. }
                | ConsultationError::SpeechSegmentStatus { .. }
                | ConsultationError::EmptySegment { .. }
        )
    }
}

/// Client-facing messages name the failing upstream but never carry raw
/// upstream bodies; those stay in the server log.
impl From<ConsultationError> for AppError {
    fn from(err: ConsultationError) -> Self {
        match err {
            ConsultationError::MissingPrompt => AppError::BadRequest(err.to_string()),
            ConsultationError::NotConfigured { .. } => AppError::Configuration(err.to_string()),
            ConsultationError::EmptyComposedPrompt
            | ConsultationError::SegmentPlanning(_)
            | ConsultationError::MissingSegment { .. } => {
                AppError::Internal("Consultation could not be processed".to_string())
            }
            ConsultationError::LanguageModelTransport(_) => {
                AppError::ExternalService("Language model service unreachable".to_string())
            }
            ConsultationError::LanguageModelTimeout { .. } => {
                AppError::Timeout("Language model service timed out".to_string())
            }
            ConsultationError::LanguageModelStatus { status, .. } => AppError::ExternalService(
                format!("Language model service returned HTTP {}", status),
            ),
            ConsultationError::InvalidModelResponse(_) | ConsultationError::EmptyModelReply => {
                AppError::ExternalService("No reply from language model service".to_string())
            }
            ConsultationError::SpeechTransport { index, total, .. } => AppError::ExternalService(
                format!("Speech service unreachable for segment {} of {}", index + 1, total),
            ),
            ConsultationError::SpeechTimeout { index, total, .. } => AppError::Timeout(format!(
                "Speech service timed out on segment {} of {}",
                index + 1,
                total
            )),
            ConsultationError::SpeechSegmentStatus { .. } | ConsultationError::EmptySegment { .. } => {
                AppError::ExternalService(err.to_string())
            }
        }
    }
}

//! # Consultation Cell
//!
//! AI consultation endpoint: a patient prompt goes to a generative-language
//! model and the reply comes back as text plus spoken audio.
//!
//! ```text
//! +-----------------------------------------------------+
//! |                Consultation Cell                    |
//! +-----------------------------------------------------+
//! |  handlers.rs    |  HTTP endpoint handlers           |
//! |  router.rs      |  Route definitions                |
//! |  models.rs      |  DTOs, pipeline values, errors    |
//! |  services/      |                                   |
//! |    validator.rs |  Request / secret checks          |
//! |    prompt.rs    |  Policy template + greeting       |
//! |    gemini.rs    |  Gemini generateContent client    |
//! |    speech.rs    |  Segmented TTS fetch + concat     |
//! |    assembler.rs |  Base64 response                  |
//! |    pipeline.rs  |  ConsultationService              |
//! +-----------------------------------------------------+
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /consult` - `{ "prompt": "..." }` → `{ "replyText", "audioBase64" }`
//! - `GET /health` - configuration status
//!
//! ## Configuration
//!
//! Required environment variables:
//! - `GOOGLE_GEMINI_API_KEY` - language model key
//! - `TTS_SA_KEY_JSON_PATH` - speech service-account file
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use consultation_cell::router::consultation_routes;
//! use shared_config::AppConfig;
//! use std::sync::Arc;
//!
//! let config = Arc::new(AppConfig::from_env());
//! let routes = consultation_routes(config);
//! ```

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AudioSegment, ConsultationError, ConsultationRequest, ConsultationResponse, ModelReply,
    SegmentRequest, SpeechOptions,
};

pub use services::{
    AudioSegmentSource, ConsultationService, GeminiClient, HttpSegmentSource, LanguageModel,
    SegmentedSpeechSynthesizer, SpeechSynthesizer,
};

pub use router::{consultation_routes, consultation_routes_with_service};

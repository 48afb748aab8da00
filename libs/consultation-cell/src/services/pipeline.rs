use std::sync::Arc;

use reqwest::Client;
use tracing::{info, instrument};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{ConsultationError, ConsultationRequest, ConsultationResponse};
use crate::services::{
    assembler::assemble,
    gemini::{GeminiClient, LanguageModel},
    prompt::{compose, PROMPT_TEMPLATE_VERSION},
    speech::{SegmentedSpeechSynthesizer, SpeechSynthesizer},
    validator::{validate_config, validate_request},
};

/// validate → compose → generate → synthesize → assemble.
///
/// Holds no per-request state; one instance is shared by every request.
pub struct ConsultationService {
    model: Arc<dyn LanguageModel>,
    speech: Arc<dyn SpeechSynthesizer>,
    clock: Arc<dyn Clock>,
}

impl ConsultationService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        speech: Arc<dyn SpeechSynthesizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { model, speech, clock }
    }

    /// Builds the production pipeline. Both upstream clients share `client`'s
    /// connection pool.
    pub fn from_config(config: &AppConfig, client: Client) -> Result<Self, ConsultationError> {
        validate_config(config)?;

        let model = GeminiClient::new(config, client.clone())?;
        let speech = SegmentedSpeechSynthesizer::from_config(config, client)?;

        Ok(Self::new(Arc::new(model), Arc::new(speech), Arc::new(SystemClock)))
    }

    #[instrument(skip(self, request), fields(consultation_id = %Uuid::new_v4(), template = PROMPT_TEMPLATE_VERSION))]
    pub async fn consult(
        &self,
        request: &ConsultationRequest,
    ) -> Result<ConsultationResponse, ConsultationError> {
        let raw_prompt = validate_request(request)?;

        let composed = compose(raw_prompt, &self.clock.now());
        let reply = self.model.generate(&composed).await?;
        info!("Model replied with {} characters", reply.text.chars().count());

        let audio = self.speech.synthesize(&reply.text).await?;
        info!("Consultation complete ({} audio bytes)", audio.len());

        Ok(assemble(reply, &audio))
    }
}

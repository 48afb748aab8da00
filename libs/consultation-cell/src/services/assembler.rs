use base64::{engine::general_purpose, Engine as _};

use crate::models::{ConsultationResponse, ModelReply};

pub fn assemble(reply: ModelReply, audio: &[u8]) -> ConsultationResponse {
    ConsultationResponse {
        reply_text: reply.text,
        audio_base64: general_purpose::STANDARD.encode(audio),
    }
}

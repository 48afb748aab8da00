pub mod assembler;
pub mod gemini;
pub mod pipeline;
pub mod prompt;
pub mod speech;
pub mod validator;

pub use gemini::{GeminiClient, LanguageModel};
pub use pipeline::ConsultationService;
pub use speech::{
    AudioSegmentSource, HttpSegmentSource, SegmentedSpeechSynthesizer, SpeechSynthesizer,
};

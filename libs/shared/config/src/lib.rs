use std::env;
use std::str::FromStr;
use tracing::warn;

pub mod credentials;

pub use credentials::{load_service_account, ConfigError, ServiceAccountCredentials};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TTS_HOST: &str = "https://translate.google.com";
pub const DEFAULT_TTS_LANGUAGE: &str = "hi";
pub const DEFAULT_TTS_MAX_SEGMENT_CHARS: usize = 200;
pub const DEFAULT_TTS_MAX_CONCURRENT_SEGMENTS: usize = 4;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TTS_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub tts_credentials_path: String,
    pub tts_host: String,
    pub tts_language: String,
    pub tts_slow: bool,
    pub tts_max_segment_chars: usize,
    pub tts_max_concurrent_segments: usize,
    pub llm_timeout_secs: u64,
    pub tts_timeout_secs: u64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` is the
    /// process-environment case; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            gemini_api_key: lookup("GOOGLE_GEMINI_API_KEY")
                .unwrap_or_else(|| {
                    warn!("GOOGLE_GEMINI_API_KEY not set, using empty value");
                    String::new()
                }),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            tts_credentials_path: lookup("TTS_SA_KEY_JSON_PATH")
                .unwrap_or_else(|| {
                    warn!("TTS_SA_KEY_JSON_PATH not set, using empty value");
                    String::new()
                }),
            tts_host: lookup("TTS_HOST")
                .unwrap_or_else(|| DEFAULT_TTS_HOST.to_string()),
            tts_language: lookup("TTS_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_TTS_LANGUAGE.to_string()),
            tts_slow: parse_or(&lookup, "TTS_SLOW", false),
            tts_max_segment_chars: parse_or(&lookup, "TTS_MAX_SEGMENT_CHARS", DEFAULT_TTS_MAX_SEGMENT_CHARS),
            tts_max_concurrent_segments: parse_or(
                &lookup,
                "TTS_MAX_CONCURRENT_SEGMENTS",
                DEFAULT_TTS_MAX_CONCURRENT_SEGMENTS,
            )
            .max(1),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS),
            tts_timeout_secs: parse_or(&lookup, "TTS_TIMEOUT_SECS", DEFAULT_TTS_TIMEOUT_SECS),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
        };

        if !config.is_consultation_configured() {
            warn!("AI consultation not fully configured - missing environment variables");
        }

        config
    }

    /// Names of the required secrets that are missing. Empty when the
    /// consultation pipeline can be built.
    pub fn consultation_config_errors(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini_api_key.trim().is_empty() {
            missing.push("GOOGLE_GEMINI_API_KEY");
        }
        if self.tts_credentials_path.trim().is_empty() {
            missing.push("TTS_SA_KEY_JSON_PATH");
        }
        missing
    }

    pub fn is_consultation_configured(&self) -> bool {
        self.consultation_config_errors().is_empty()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}

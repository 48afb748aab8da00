use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{header, Client, Url};
use tracing::{debug, error, info, instrument};

use shared_config::AppConfig;

use crate::models::{AudioSegment, ConsultationError, SegmentRequest, SpeechOptions};

/// The translate endpoint rejects requests without a browser-like agent.
pub const SPEECH_USER_AGENT: &str = "Mozilla/5.0";

const SLOW_SPEED: &str = "0.24";
const NORMAL_SPEED: &str = "1";

/// Turns reply text into one contiguous audio buffer.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ConsultationError>;
}

/// Fetches the audio for a single planned segment.
#[async_trait]
pub trait AudioSegmentSource: Send + Sync {
    async fn fetch_segment(&self, segment: &SegmentRequest) -> Result<AudioSegment, ConsultationError>;
}

// ==============================================================================
// SEGMENT PLANNING
// ==============================================================================

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}' || c.is_ascii_punctuation()
}

/// Splits `text` into chunks of at most `max_units` UTF-16 code units (the
/// length the speech endpoint enforces), breaking at whitespace or
/// punctuation the way the endpoint expects. Chunks keep their trailing
/// separator; blank chunks are dropped.
pub fn split_text(text: &str, max_units: usize) -> Result<Vec<String>, ConsultationError> {
    if text.trim().is_empty() {
        return Err(ConsultationError::SegmentPlanning("text is empty".to_string()));
    }

    let max_units = max_units.max(1);
    let chars: Vec<char> = text.chars().collect();

    // offsets[i] is the UTF-16 length of chars[..i]
    let mut offsets = Vec::with_capacity(chars.len() + 1);
    offsets.push(0);
    for c in &chars {
        let last = offsets[offsets.len() - 1];
        offsets.push(last + c.len_utf16());
    }
    let units = |from: usize, to: usize| offsets[to] - offsets[from];

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        if units(start, chars.len()) <= max_units {
            chunks.push(chars[start..].iter().collect::<String>());
            break;
        }

        let overlong = |start: usize| {
            let word: String = chars[start..]
                .iter()
                .take_while(|&&c| !is_separator(c))
                .collect();
            ConsultationError::SegmentPlanning(format!(
                "word longer than {} characters: {}",
                max_units, word
            ))
        };

        // last char that still fits in the window
        let limit = (start..chars.len())
            .take_while(|&i| units(start, i + 1) <= max_units)
            .last()
            .ok_or_else(|| overlong(start))?;

        let end = if is_separator(chars[limit]) || chars.get(limit + 1).copied().is_some_and(is_separator) {
            limit
        } else {
            (start..=limit)
                .rev()
                .find(|&i| is_separator(chars[i]))
                .ok_or_else(|| overlong(start))?
        };

        chunks.push(chars[start..=end].iter().collect::<String>());
        start = end + 1;
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    Ok(chunks)
}

/// URL speaking `text` in full. `textlen` counts UTF-16 units, as the
/// endpoint does.
pub fn segment_url(base: &Url, text: &str, language: &str, slow: bool) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("ie", "UTF-8")
        .append_pair("q", text)
        .append_pair("tl", language)
        .append_pair("total", "1")
        .append_pair("idx", "0")
        .append_pair("textlen", &text.encode_utf16().count().to_string())
        .append_pair("client", "tw-ob")
        .append_pair("prompt", "input")
        .append_pair("ttsspeed", if slow { SLOW_SPEED } else { NORMAL_SPEED });
    url
}

pub fn speech_endpoint(host: &str) -> Result<Url, ConsultationError> {
    Url::parse(&format!("{}/translate_tts", host.trim_end_matches('/'))).map_err(|e| {
        ConsultationError::NotConfigured {
            missing: format!("valid TTS_HOST ({}: {})", host, e),
        }
    })
}

pub fn plan_segments(
    text: &str,
    endpoint: &Url,
    options: &SpeechOptions,
) -> Result<Vec<SegmentRequest>, ConsultationError> {
    let chunks = split_text(text, options.max_segment_chars)?;
    let total = chunks.len();

    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| SegmentRequest {
            index,
            total,
            url: segment_url(endpoint, &chunk, &options.language, options.slow).to_string(),
            text: chunk,
        })
        .collect())
}

// ==============================================================================
// FETCHING
// ==============================================================================

/// Fetches every segment with at most `max_concurrency` requests in flight.
/// Results are slotted by their planned index, so completion order never
/// affects the output. The first failure aborts and drops the rest.
pub async fn fetch_segments<S>(
    source: &S,
    segments: &[SegmentRequest],
    max_concurrency: usize,
) -> Result<Vec<AudioSegment>, ConsultationError>
where
    S: AudioSegmentSource + ?Sized,
{
    let mut slots: Vec<Option<AudioSegment>> = (0..segments.len()).map(|_| None).collect();

    let mut in_flight = stream::iter(0..segments.len())
        .map(|position| {
            let segment = &segments[position];
            async move { (segment.index, source.fetch_segment(segment).await) }
        })
        .buffer_unordered(max_concurrency.max(1));

    while let Some((index, result)) = in_flight.next().await {
        let segment = result?;
        debug!("Segment {} fetched ({} bytes)", index, segment.bytes.len());
        match slots.get_mut(index) {
            Some(slot) => *slot = Some(segment),
            None => return Err(ConsultationError::MissingSegment { index }),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(ConsultationError::MissingSegment { index }))
        .collect()
}

pub fn concat_segments(segments: Vec<AudioSegment>) -> Vec<u8> {
    let size = segments.iter().map(|segment| segment.bytes.len()).sum();
    let mut audio = Vec::with_capacity(size);
    for segment in segments {
        audio.extend_from_slice(&segment.bytes);
    }
    audio
}

pub struct HttpSegmentSource {
    client: Client,
    timeout: Duration,
}

impl HttpSegmentSource {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl AudioSegmentSource for HttpSegmentSource {
    async fn fetch_segment(&self, segment: &SegmentRequest) -> Result<AudioSegment, ConsultationError> {
        let transport_error = |err: reqwest::Error| {
            if err.is_timeout() {
                ConsultationError::SpeechTimeout {
                    index: segment.index,
                    total: segment.total,
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                ConsultationError::SpeechTransport {
                    index: segment.index,
                    total: segment.total,
                    message: err.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(&segment.url)
            .header(header::USER_AGENT, SPEECH_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            error!("TTS fetch failed for segment {}/{} with status: {}", segment.index + 1, segment.total, status);
            return Err(ConsultationError::SpeechSegmentStatus {
                index: segment.index,
                total: segment.total,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.is_empty() {
            return Err(ConsultationError::EmptySegment {
                index: segment.index,
                total: segment.total,
            });
        }

        Ok(AudioSegment {
            index: segment.index,
            bytes: bytes.to_vec(),
        })
    }
}

// ==============================================================================
// SYNTHESIZER
// ==============================================================================

pub struct SegmentedSpeechSynthesizer<S> {
    source: S,
    endpoint: Url,
    options: SpeechOptions,
    max_concurrency: usize,
}

impl SegmentedSpeechSynthesizer<HttpSegmentSource> {
    pub fn from_config(config: &AppConfig, client: Client) -> Result<Self, ConsultationError> {
        if config.tts_credentials_path.trim().is_empty() {
            return Err(ConsultationError::NotConfigured {
                missing: "TTS_SA_KEY_JSON_PATH".to_string(),
            });
        }

        let source = HttpSegmentSource::new(client, Duration::from_secs(config.tts_timeout_secs));
        let options = SpeechOptions {
            host: config.tts_host.clone(),
            language: config.tts_language.clone(),
            slow: config.tts_slow,
            max_segment_chars: config.tts_max_segment_chars,
        };

        Self::new(source, options, config.tts_max_concurrent_segments)
    }
}

impl<S: AudioSegmentSource> SegmentedSpeechSynthesizer<S> {
    pub fn new(source: S, options: SpeechOptions, max_concurrency: usize) -> Result<Self, ConsultationError> {
        let endpoint = speech_endpoint(&options.host)?;
        Ok(Self {
            source,
            endpoint,
            options,
            max_concurrency: max_concurrency.max(1),
        })
    }
}

#[async_trait]
impl<S: AudioSegmentSource> SpeechSynthesizer for SegmentedSpeechSynthesizer<S> {
    #[instrument(skip(self, text), fields(language = %self.options.language, text_chars = text.chars().count()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ConsultationError> {
        let segments = plan_segments(text, &self.endpoint, &self.options)?;
        info!("Synthesizing speech in {} segments", segments.len());

        let fetched = fetch_segments(&self.source, &segments, self.max_concurrency).await?;
        let audio = concat_segments(fetched);

        debug!("Synthesized {} bytes of audio", audio.len());
        Ok(audio)
    }
}

//! Speech service clients and the trait seams the session talks through.
//!
//! Synthesis goes through a translate-style TTS endpoint (`?q=` text,
//! `?tl=` language) that answers with MP3 bytes. Recognition goes through
//! a recognize endpoint that takes raw L16 audio and answers with
//! newline-delimited JSON.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::audio::{AudioConfig, Player, Recorder};
use crate::error::{NotesError, Result};

const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";
const DEFAULT_STT_ENDPOINT: &str = "http://www.google.com/speech-api/v2/recognize";

/// Speech service configuration.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Text-to-speech endpoint.
    pub tts_endpoint: String,
    /// Speech-to-text recognize endpoint.
    pub stt_endpoint: String,
    /// API key for the recognize endpoint, if the deployment wants one.
    pub api_key: Option<String>,
    /// Language tag sent to both endpoints.
    pub language: String,
    /// Sample rate of captured audio in Hz.
    pub sample_rate: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            tts_endpoint: DEFAULT_TTS_ENDPOINT.to_string(),
            stt_endpoint: DEFAULT_STT_ENDPOINT.to_string(),
            api_key: None,
            language: "en".to_string(),
            sample_rate: 16_000,
        }
    }
}

impl SpeechConfig {
    /// Build configuration from environment variables, falling back to
    /// the public endpoints.
    pub fn from_env() -> Self {
        let defaults = SpeechConfig::default();
        SpeechConfig {
            tts_endpoint: std::env::var("DOCKHAND_TTS_URL").unwrap_or(defaults.tts_endpoint),
            stt_endpoint: std::env::var("DOCKHAND_STT_URL").unwrap_or(defaults.stt_endpoint),
            api_key: std::env::var("DOCKHAND_STT_KEY").ok(),
            language: std::env::var("DOCKHAND_STT_LANG").unwrap_or(defaults.language),
            sample_rate: defaults.sample_rate,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Text-to-speech client.
pub struct TtsClient {
    config: SpeechConfig,
    http_client: reqwest::Client,
}

impl TtsClient {
    pub fn new(config: SpeechConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Fetch spoken audio for `text` and return a temp file holding the
    /// MP3 bytes.
    pub async fn synthesize(&self, text: &str) -> Result<NamedTempFile> {
        debug!(text, "synthesizing prompt");
        let response = self
            .http_client
            .get(&self.config.tts_endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", self.config.language.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let mut file = NamedTempFile::new()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file)
    }
}

/// Speech-to-text client.
pub struct SttClient {
    config: SpeechConfig,
    http_client: reqwest::Client,
}

impl SttClient {
    pub fn new(config: SpeechConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Transcribe one raw L16 capture.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        debug!(bytes = audio.len(), "transcribing capture");
        let mut request = self
            .http_client
            .post(&self.config.stt_endpoint)
            .query(&[("output", "json"), ("lang", self.config.language.as_str())])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/l16; rate={}", self.config.sample_rate),
            )
            .body(audio.to_vec());
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        parse_transcript(&body)
    }
}

/// Pick the best transcript out of a recognize response.
///
/// The body is one JSON object per line. The first line usually carries an
/// empty result list and the real answer follows:
///
/// ```text
/// {"result":[]}
/// {"result":[{"alternative":[{"transcript":"met her at the conference"}],"final":true}],"result_index":0}
/// ```
///
/// No line with a non-empty transcript means the service could not make
/// out any words.
fn parse_transcript(body: &str) -> Result<String> {
    #[derive(Deserialize)]
    struct ResponseLine {
        #[serde(default)]
        result: Vec<RecognitionResult>,
    }

    #[derive(Deserialize)]
    struct RecognitionResult {
        #[serde(default)]
        alternative: Vec<Alternative>,
    }

    #[derive(Deserialize)]
    struct Alternative {
        transcript: Option<String>,
    }

    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: ResponseLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(_) => continue,
        };
        let transcript = parsed
            .result
            .first()
            .and_then(|result| result.alternative.first())
            .and_then(|alternative| alternative.transcript.as_deref())
            .map(str::trim)
            .unwrap_or("");
        if !transcript.is_empty() {
            return Ok(transcript.to_string());
        }
    }

    Err(NotesError::Unintelligible)
}

/// Speaks prompts to the person at the machine.
#[async_trait]
pub trait PromptSpeaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Captures one spoken utterance and turns it into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn next_utterance(&self) -> Result<String>;
}

/// Production speaker: synthesize through the TTS service, play through
/// the local player.
pub struct VoicePrompt {
    tts: TtsClient,
    player: Player,
}

impl VoicePrompt {
    pub fn new(speech: SpeechConfig, audio: AudioConfig) -> Self {
        VoicePrompt {
            tts: TtsClient::new(speech),
            player: Player::new(audio),
        }
    }
}

#[async_trait]
impl PromptSpeaker for VoicePrompt {
    async fn speak(&self, text: &str) -> Result<()> {
        let prompt = self.tts.synthesize(text).await?;
        self.player.play(prompt.path()).await?;
        Ok(())
    }
}

/// Production transcriber: record from the microphone, send the capture
/// to the recognize endpoint.
pub struct MicrophoneTranscriber {
    stt: SttClient,
    recorder: Recorder,
}

impl MicrophoneTranscriber {
    pub fn new(speech: SpeechConfig, audio: AudioConfig) -> Self {
        MicrophoneTranscriber {
            stt: SttClient::new(speech),
            recorder: Recorder::new(audio),
        }
    }
}

#[async_trait]
impl Transcriber for MicrophoneTranscriber {
    async fn next_utterance(&self) -> Result<String> {
        let capture = self.recorder.capture().await?;
        let audio = std::fs::read(capture.path())?;
        self.stt.transcribe(&audio).await
    }
}

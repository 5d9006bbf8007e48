use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::audio::AudioChunk;

/// Errors from a transcription provider call
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcription service error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Transcribes a captured audio chunk to text
///
/// An empty result string means no speech was detected; callers skip the
/// transcript append rather than treating it as an error.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Groq speech-to-text (Whisper models behind an OpenAI-compatible API)
pub struct GroqTranscriber {
    client: reqwest::Client,
    api_key: String,
}

impl GroqTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Transcriber for GroqTranscriber {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        transcribe_whisper(
            &self.client,
            "https://api.groq.com/openai/v1/audio/transcriptions",
            &self.api_key,
            "whisper-large-v3",
            chunk,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

/// OpenAI Whisper speech-to-text
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        transcribe_whisper(
            &self.client,
            "https://api.openai.com/v1/audio/transcriptions",
            &self.api_key,
            "whisper-1",
            chunk,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Shared multipart upload against a Whisper-style transcription endpoint
async fn transcribe_whisper(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    model: &str,
    chunk: &AudioChunk,
) -> Result<String, TranscriptionError> {
    debug!(
        "Sending {:.2}s audio chunk ({} bytes) to {} for transcription",
        chunk.duration_seconds(),
        chunk.bytes.len(),
        model
    );

    let form = reqwest::multipart::Form::new()
        .part(
            "file",
            reqwest::multipart::Part::bytes(chunk.bytes.clone())
                .file_name("audio.wav")
                .mime_str("audio/wav")?,
        )
        .text("model", model.to_string())
        .text("response_format", "text");

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TranscriptionError::Api { status, body });
    }

    // response_format=text returns the transcript as a plain-text body
    let text = response.text().await?;
    Ok(text.trim().to_string())
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capture::MicrophoneSource;
use super::chunk::AudioChunk;
use super::upload::{UploadQueue, UploadSource};

/// Errors from the audio capture layer
#[derive(Debug, Error)]
pub enum AudioError {
    /// Input device could not be opened or the stream failed to start
    #[error("audio device error: {0}")]
    Device(String),

    /// WAV framing failed
    #[error("failed to encode WAV data: {0}")]
    Encode(#[from] hound::Error),

    /// Uploaded audio data could not be decoded
    #[error("unsupported audio data: {0}")]
    UnsupportedFormat(String),
}

/// Configuration for an audio source
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    /// Capture sample rate in Hz (Whisper-style STT expects 16kHz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono)
    pub channels: u16,
    /// Bound on the frame queue between the capture callback and the drain
    pub queue_capacity: usize,
    /// How long to wait for each queued frame before giving up the drain
    pub frame_wait: Duration,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz for speech transcription
            channels: 1,        // Mono
            queue_capacity: 64,
            frame_wait: Duration::from_millis(100),
        }
    }
}

/// Audio source trait
///
/// Implementations:
/// - Microphone: cpal input stream on a dedicated capture thread
/// - Upload: queue of uploaded/browser-recorded WAV blobs (no device access)
///
/// `get_chunk` is the sole consumer of the underlying frame queue and must be
/// called from a single caller.
pub trait AudioSource: Send {
    /// Start capturing audio
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop capturing and release device resources
    fn stop(&mut self);

    /// Drain up to `duration` worth of buffered audio into a WAV-framed chunk
    ///
    /// Returns `None` when nothing is buffered; a shorter chunk when fewer
    /// frames arrive before the per-frame wait elapses.
    fn get_chunk(&mut self, duration: Duration) -> Option<AudioChunk>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Audio input selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioInput {
    /// Live microphone input
    Microphone,
    /// Uploaded audio blobs standing in for live capture
    Upload,
}

/// Audio source factory
pub struct AudioSourceFactory;

impl AudioSourceFactory {
    /// Create an audio source for the configured input kind
    ///
    /// For `Upload`, the returned queue handle is the push side used by the
    /// ingestion endpoint.
    pub fn create(
        input: AudioInput,
        config: AudioSourceConfig,
    ) -> (Box<dyn AudioSource>, Option<UploadQueue>) {
        match input {
            AudioInput::Microphone => (Box::new(MicrophoneSource::new(config)), None),
            AudioInput::Upload => {
                let (source, queue) = UploadSource::new();
                (Box::new(source), Some(queue))
            }
        }
    }
}

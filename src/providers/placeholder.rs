use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Local;

use crate::audio::AudioChunk;

use super::suggest::{Advisor, SuggestionError};
use super::transcribe::{Transcriber, TranscriptionError};

/// Demo suggestions served in rotation when no credential is configured
const ROTATION: [&str; 4] = [
    "💡 Tip: Ask about their current challenges",
    "⚠️ Reminder: Mention the ROI benefits",
    "❗ Alert: Customer mentioned budget concerns",
    "🎯 Close: Good time to ask for next steps",
];

/// Transcriber used when the configured provider has no credential
///
/// Returns a clearly labeled synthetic transcript so the pipeline keeps
/// moving in demo environments.
pub struct PlaceholderTranscriber;

impl PlaceholderTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlaceholderTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for PlaceholderTranscriber {
    async fn transcribe(&self, _chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        Ok(format!(
            "[placeholder transcription at {}]",
            Local::now().format("%H:%M:%S")
        ))
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

/// Advisor used when the configured provider has no credential
pub struct PlaceholderAdvisor {
    cursor: AtomicUsize,
}

impl PlaceholderAdvisor {
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Default for PlaceholderAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Advisor for PlaceholderAdvisor {
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError> {
        if window.trim().is_empty() {
            return Ok(Vec::new());
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % ROTATION.len();
        Ok(vec![ROTATION[index].to_string()])
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

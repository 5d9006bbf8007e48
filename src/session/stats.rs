use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transcribed chunk of conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// When the transcription was appended
    pub timestamp: DateTime<Utc>,

    /// Recognized text
    pub text: String,
}

/// One generated suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    /// When the suggestion was appended
    pub timestamp: DateTime<Utc>,

    /// Suggestion text, prefixed with its category marker
    pub text: String,
}

/// Statistics about a call session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Whether recording is currently active
    pub is_recording: bool,

    /// When the session started, if it ever did
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the session started
    pub duration_secs: f64,

    /// Number of transcript entries accumulated
    pub transcript_entries: usize,

    /// Number of suggestions currently retained
    pub suggestion_entries: usize,
}

//! Call session management
//!
//! This module provides the `SessionPipeline` abstraction that manages:
//! - Audio chunk intake from the configured source
//! - Chunked transcription through the configured provider
//! - Throttled suggestion generation from recent transcript context
//! - Session lifecycle, logs, and statistics

mod config;
mod pipeline;
mod stats;

pub use config::SessionConfig;
pub use pipeline::{SessionError, SessionPipeline};
pub use stats::{SessionStats, SuggestionEntry, TranscriptEntry};

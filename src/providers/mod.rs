//! Hosted transcription and suggestion providers
//!
//! Two provider families are supported behind the same traits: Groq
//! (primary) and OpenAI (fallback). Selection happens once at construction;
//! a missing credential yields the placeholder implementations so the
//! pipeline keeps producing output without keys.

mod placeholder;
mod suggest;
mod transcribe;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use placeholder::{PlaceholderAdvisor, PlaceholderTranscriber};
pub use suggest::{
    extract_suggestion, Advisor, GroqAdvisor, OpenAiAdvisor, SuggestionError,
    NO_SUGGESTIONS_SENTINEL,
};
pub use transcribe::{GroqTranscriber, OpenAiTranscriber, Transcriber, TranscriptionError};

/// Hosted provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    OpenAi,
}

impl Provider {
    /// Read this provider's credential slot from the environment
    ///
    /// Read once at construction time; an empty or missing variable means
    /// placeholder mode.
    pub fn credential(self) -> Option<String> {
        let var = match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        };
        std::env::var(var).ok().filter(|key| !key.trim().is_empty())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Groq => write!(f, "groq"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Build the transcription client for a provider selection
pub fn build_transcriber(provider: Provider, api_key: Option<String>) -> Arc<dyn Transcriber> {
    match api_key {
        Some(key) => match provider {
            Provider::Groq => Arc::new(GroqTranscriber::new(key)),
            Provider::OpenAi => Arc::new(OpenAiTranscriber::new(key)),
        },
        None => {
            warn!(
                "No credential for {} transcription, using placeholder output",
                provider
            );
            Arc::new(PlaceholderTranscriber::new())
        }
    }
}

/// Build the suggestion client for a provider selection
pub fn build_advisor(provider: Provider, api_key: Option<String>) -> Arc<dyn Advisor> {
    match api_key {
        Some(key) => match provider {
            Provider::Groq => Arc::new(GroqAdvisor::new(key)),
            Provider::OpenAi => Arc::new(OpenAiAdvisor::new(key)),
        },
        None => {
            warn!(
                "No credential for {} suggestions, using placeholder output",
                provider
            );
            Arc::new(PlaceholderAdvisor::new())
        }
    }
}

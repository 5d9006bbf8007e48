use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::audio::{AudioError, AudioSource};
use crate::providers::{Advisor, Transcriber};

use super::config::SessionConfig;
use super::stats::{SessionStats, SuggestionEntry, TranscriptEntry};

/// Session lifecycle errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session is already recording")]
    AlreadyActive,

    #[error(transparent)]
    Device(#[from] AudioError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Recording,
}

/// Orchestrates one call session: audio intake, transcription, and throttled
/// suggestion generation
///
/// The pipeline is pull-driven: an external driver invokes `tick()` roughly
/// once per second while recording. Each tick runs to completion before the
/// next, so the logs are only ever mutated from a single caller.
pub struct SessionPipeline {
    config: SessionConfig,
    source: Box<dyn AudioSource>,
    transcriber: Arc<dyn Transcriber>,
    advisor: Arc<dyn Advisor>,
    state: SessionState,
    started_at: Option<chrono::DateTime<Utc>>,
    transcript: Vec<TranscriptEntry>,
    suggestions: Vec<SuggestionEntry>,
    last_suggestion_at: Option<Instant>,
}

impl SessionPipeline {
    pub fn new(
        config: SessionConfig,
        source: Box<dyn AudioSource>,
        transcriber: Arc<dyn Transcriber>,
        advisor: Arc<dyn Advisor>,
    ) -> Self {
        Self {
            config,
            source,
            transcriber,
            advisor,
            state: SessionState::Idle,
            started_at: None,
            transcript: Vec::new(),
            suggestions: Vec::new(),
            last_suggestion_at: None,
        }
    }

    /// Start a new session
    ///
    /// Clears both logs and begins audio capture. Fails with `AlreadyActive`
    /// while recording; a device failure leaves the pipeline idle.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Recording {
            return Err(SessionError::AlreadyActive);
        }

        self.source.start()?;

        self.config.session_id = format!("call-{}", uuid::Uuid::new_v4());
        self.transcript.clear();
        self.suggestions.clear();
        self.started_at = Some(Utc::now());
        // The throttle clock starts at session start, so the first
        // suggestion attempt waits out a full interval.
        self.last_suggestion_at = Some(Instant::now());
        self.state = SessionState::Recording;

        info!(
            "Session {} started ({} audio)",
            self.config.session_id,
            self.source.name()
        );

        Ok(())
    }

    /// Run one pipeline cycle: drain a chunk, transcribe it, and generate a
    /// suggestion if the throttle interval has elapsed
    ///
    /// No-op unless recording. Provider failures are reported and skipped;
    /// they never end the session.
    pub async fn tick(&mut self) {
        if self.state != SessionState::Recording {
            return;
        }

        let Some(chunk) = self.source.get_chunk(self.config.chunk_duration) else {
            return;
        };

        debug!(
            "Processing {:.2}s audio chunk ({} bytes)",
            chunk.duration_seconds(),
            chunk.bytes.len()
        );

        let transcribed = self.transcriber.transcribe(&chunk).await;
        match transcribed {
            Ok(text) => {
                let text = text.trim();
                // Empty text means silence, not an error; nothing to append.
                if !text.is_empty() {
                    self.transcript.push(TranscriptEntry {
                        timestamp: Utc::now(),
                        text: text.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!("Transcription failed, skipping this chunk: {}", e);
            }
        }

        self.maybe_suggest().await;
    }

    /// Stop the session and release audio resources
    ///
    /// Idempotent; stopping an idle pipeline is a no-op. Returns the final
    /// statistics either way.
    pub fn stop(&mut self) -> SessionStats {
        if self.state == SessionState::Recording {
            self.source.stop();
            self.state = SessionState::Idle;
            info!("Session {} stopped", self.config.session_id);
        }
        self.stats()
    }

    /// Swap provider clients; rejected while a session is recording
    pub fn set_providers(
        &mut self,
        transcriber: Arc<dyn Transcriber>,
        advisor: Arc<dyn Advisor>,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Recording {
            return Err(SessionError::AlreadyActive);
        }
        self.transcriber = transcriber;
        self.advisor = advisor;
        info!(
            "Providers updated: transcription={}, suggestions={}",
            self.transcriber.name(),
            self.advisor.name()
        );
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn started_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.started_at
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        &self.suggestions
    }

    /// Current session statistics
    pub fn stats(&self) -> SessionStats {
        let duration_secs = self
            .started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionStats {
            session_id: self.config.session_id.clone(),
            is_recording: self.is_recording(),
            started_at: self.started_at,
            duration_secs,
            transcript_entries: self.transcript.len(),
            suggestion_entries: self.suggestions.len(),
        }
    }

    /// Attempt a suggestion if the throttle allows it
    ///
    /// With an empty transcript there is nothing to prompt with: no attempt
    /// is made and the throttle clock is left untouched. When an attempt is
    /// made the clock advances even if the provider call fails.
    async fn maybe_suggest(&mut self) {
        if self.transcript.is_empty() {
            return;
        }

        let due = match self.last_suggestion_at {
            Some(last) => last.elapsed() > self.config.suggestion_interval,
            None => true,
        };
        if !due {
            return;
        }

        let window = self.context_window();
        let suggested = self.advisor.suggest(&window).await;
        match suggested {
            Ok(items) => {
                let now = Utc::now();
                for text in items {
                    debug!("New suggestion: {}", text);
                    self.suggestions.push(SuggestionEntry {
                        timestamp: now,
                        text,
                    });
                }
            }
            Err(e) => {
                warn!("Suggestion request failed, none this cycle: {}", e);
            }
        }

        self.last_suggestion_at = Some(Instant::now());

        if self.suggestions.len() > self.config.max_suggestions {
            let excess = self.suggestions.len() - self.config.max_suggestions;
            self.suggestions.drain(..excess);
        }
    }

    /// Space-joined text of the most recent transcript entries, oldest first
    fn context_window(&self) -> String {
        let start = self
            .transcript
            .len()
            .saturating_sub(self.config.context_entries);
        self.transcript[start..]
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// Integration tests for the session pipeline
//
// Provider and audio-source behavior is scripted through the public traits;
// the suggestion throttle is driven with the paused tokio clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use call_assist::audio::{AudioChunk, AudioError, AudioSource};
use call_assist::providers::{
    Advisor, SuggestionError, Transcriber, TranscriptionError,
};
use call_assist::session::{SessionConfig, SessionError, SessionPipeline};

// ============================================================================
// Scripted collaborators
// ============================================================================

/// Always serves a 2-second chunk of silence while started
struct ConstantSource {
    active: bool,
}

impl ConstantSource {
    fn new() -> Self {
        Self { active: false }
    }
}

impl AudioSource for ConstantSource {
    fn start(&mut self) -> Result<(), AudioError> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn get_chunk(&mut self, _duration: Duration) -> Option<AudioChunk> {
        if !self.active {
            return None;
        }
        AudioChunk::from_samples(&[0i16; 32000], 16000).ok()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Fails to open, like a missing input device
struct BrokenSource;

impl AudioSource for BrokenSource {
    fn start(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Device("no input device available".to_string()))
    }

    fn stop(&mut self) {}

    fn get_chunk(&mut self, _duration: Duration) -> Option<AudioChunk> {
        None
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Returns a fixed text and counts calls
struct StaticTranscriber {
    text: String,
    calls: Arc<AtomicUsize>,
}

impl StaticTranscriber {
    fn new(text: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                text: text.to_string(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Always fails, like an unreachable provider
struct BrokenTranscriber;

#[async_trait]
impl Transcriber for BrokenTranscriber {
    async fn transcribe(&self, _chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::Api {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream unavailable".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Returns one numbered suggestion per call and counts calls
struct CountingAdvisor {
    calls: Arc<AtomicUsize>,
}

impl CountingAdvisor {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Advisor for CountingAdvisor {
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError> {
        if window.trim().is_empty() {
            return Ok(Vec::new());
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![format!("💡 Tip: note {}", n)])
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Always fails, like an unreachable model endpoint
struct BrokenAdvisor;

#[async_trait]
impl Advisor for BrokenAdvisor {
    async fn suggest(&self, _window: &str) -> Result<Vec<String>, SuggestionError> {
        Err(SuggestionError::Api {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "model overloaded".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

fn pipeline_with(
    source: Box<dyn AudioSource>,
    transcriber: Arc<dyn Transcriber>,
    advisor: Arc<dyn Advisor>,
) -> SessionPipeline {
    SessionPipeline::new(SessionConfig::default(), source, transcriber, advisor)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_start_twice_is_rejected() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("hello");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;
    assert!(matches!(
        pipeline.start(),
        Err(SessionError::AlreadyActive)
    ));
    assert!(pipeline.is_recording());

    Ok(())
}

#[tokio::test]
async fn test_device_failure_keeps_session_idle() {
    let (transcriber, _) = StaticTranscriber::new("hello");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(BrokenSource),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    assert!(matches!(pipeline.start(), Err(SessionError::Device(_))));
    assert!(!pipeline.is_recording());
    assert!(pipeline.started_at().is_none());
}

#[tokio::test]
async fn test_stop_is_idempotent() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("hello");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;
    let stats = pipeline.stop();
    assert!(!stats.is_recording);

    // Stopping again is a harmless no-op
    let stats = pipeline.stop();
    assert!(!stats.is_recording);
    assert!(!pipeline.is_recording());

    Ok(())
}

#[tokio::test]
async fn test_tick_is_noop_while_idle() -> Result<()> {
    let (transcriber, transcribe_calls) = StaticTranscriber::new("hello");
    let (advisor, suggest_calls) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.tick().await;
    pipeline.tick().await;

    assert_eq!(transcribe_calls.load(Ordering::SeqCst), 0);
    assert_eq!(suggest_calls.load(Ordering::SeqCst), 0);
    assert!(pipeline.transcript().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_restart_clears_previous_logs() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("customer asked about pricing");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;
    pipeline.tick().await;
    assert_eq!(pipeline.transcript().len(), 1);
    let first_id = pipeline.session_id().to_string();
    pipeline.stop();

    pipeline.start()?;
    assert!(pipeline.transcript().is_empty());
    assert!(pipeline.suggestions().is_empty());
    assert_ne!(pipeline.session_id(), first_id);

    Ok(())
}

#[tokio::test]
async fn test_set_providers_rejected_while_recording() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("hello");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    let (replacement_t, _) = StaticTranscriber::new("other");
    let (replacement_a, _) = CountingAdvisor::new();
    assert!(matches!(
        pipeline.set_providers(Arc::new(replacement_t), Arc::new(replacement_a)),
        Err(SessionError::AlreadyActive)
    ));

    pipeline.stop();
    let (replacement_t, _) = StaticTranscriber::new("other");
    let (replacement_a, _) = CountingAdvisor::new();
    pipeline.set_providers(Arc::new(replacement_t), Arc::new(replacement_a))?;

    Ok(())
}

// ============================================================================
// Tick behavior
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_suggestion_throttle_allows_one_call_per_interval() -> Result<()> {
    let (transcriber, transcribe_calls) = StaticTranscriber::new("the customer is hesitant");
    let (advisor, suggest_calls) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    // Three ticks spread over nine simulated seconds
    pipeline.tick().await;
    tokio::time::advance(Duration::from_secs(3)).await;
    pipeline.tick().await;
    tokio::time::advance(Duration::from_secs(3)).await;
    pipeline.tick().await;
    tokio::time::advance(Duration::from_secs(3)).await;

    assert_eq!(transcribe_calls.load(Ordering::SeqCst), 3);
    // Only the third tick had strictly more than the interval elapsed
    assert_eq!(suggest_calls.load(Ordering::SeqCst), 1);
    assert_eq!(pipeline.transcript().len(), 3);
    assert!(pipeline.suggestions().len() <= 10);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_log_truncates_oldest_first() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("still talking");
    let (advisor, suggest_calls) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    for _ in 0..14 {
        tokio::time::advance(Duration::from_secs(4)).await;
        pipeline.tick().await;
    }

    assert_eq!(suggest_calls.load(Ordering::SeqCst), 14);
    assert_eq!(pipeline.suggestions().len(), 10, "log is capped at 10");
    // Entries 0..=3 were dropped, the rest survive in order
    assert_eq!(pipeline.suggestions()[0].text, "💡 Tip: note 4");
    assert_eq!(pipeline.suggestions()[9].text, "💡 Tip: note 13");

    // The transcript is never truncated
    assert_eq!(pipeline.transcript().len(), 14);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_empty_transcription_is_not_appended() -> Result<()> {
    let (transcriber, transcribe_calls) = StaticTranscriber::new("   ");
    let (advisor, suggest_calls) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(4)).await;
        pipeline.tick().await;
    }

    assert_eq!(transcribe_calls.load(Ordering::SeqCst), 3);
    assert!(pipeline.transcript().is_empty(), "silence appends nothing");
    // With nothing to prompt with, no suggestion attempt is ever made
    assert_eq!(suggest_calls.load(Ordering::SeqCst), 0);
    assert!(pipeline.suggestions().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_transcription_failure_skips_entry_and_continues() -> Result<()> {
    let (advisor, suggest_calls) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(BrokenTranscriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(4)).await;
        pipeline.tick().await;
    }

    assert!(pipeline.is_recording(), "provider failure never ends the session");
    assert!(pipeline.transcript().is_empty());
    assert_eq!(suggest_calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_failure_yields_none_but_advances_throttle() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("budget concerns came up");
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(BrokenAdvisor),
    );

    pipeline.start()?;

    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(4)).await;
        pipeline.tick().await;
    }

    assert!(pipeline.is_recording());
    assert_eq!(pipeline.transcript().len(), 3);
    assert!(pipeline.suggestions().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_transcript_grows_monotonically() -> Result<()> {
    let (transcriber, _) = StaticTranscriber::new("and another thing");
    let (advisor, _) = CountingAdvisor::new();
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(transcriber),
        Arc::new(advisor),
    );

    pipeline.start()?;

    let mut previous = 0;
    for _ in 0..6 {
        tokio::time::advance(Duration::from_secs(2)).await;
        pipeline.tick().await;
        let len = pipeline.transcript().len();
        assert!(len >= previous, "transcript must never shrink");
        previous = len;
    }
    assert_eq!(previous, 6);

    // Entries are in chronological append order
    let transcript = pipeline.transcript();
    for pair in transcript.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    Ok(())
}

/// Returns a numbered utterance per call
struct VariedTranscriber {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Transcriber for VariedTranscriber {
    async fn transcribe(&self, _chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("utterance {}", n))
    }

    fn name(&self) -> &'static str {
        "varied"
    }
}

/// Records every context window it is asked about
struct WindowRecorder {
    windows: Arc<std::sync::Mutex<Vec<String>>>,
}

#[async_trait]
impl Advisor for WindowRecorder {
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError> {
        if window.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.windows.lock().unwrap().push(window.to_string());
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test(start_paused = true)]
async fn test_context_window_is_last_five_entries_in_order() -> Result<()> {
    let windows = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut pipeline = pipeline_with(
        Box::new(ConstantSource::new()),
        Arc::new(VariedTranscriber {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(WindowRecorder {
            windows: Arc::clone(&windows),
        }),
    );

    pipeline.start()?;

    for _ in 0..7 {
        tokio::time::advance(Duration::from_secs(4)).await;
        pipeline.tick().await;
    }

    let windows = windows.lock().unwrap();
    assert_eq!(windows.len(), 7);
    // First attempt only had one entry to work with
    assert_eq!(windows[0], "utterance 0");
    // Later attempts see exactly the five most recent entries, oldest first
    assert_eq!(
        windows[6],
        "utterance 2 utterance 3 utterance 4 utterance 5 utterance 6"
    );

    Ok(())
}

#[test]
fn test_session_config_defaults() {
    let config = SessionConfig::default();

    assert_eq!(config.chunk_duration, Duration::from_secs(2));
    assert_eq!(config.suggestion_interval, Duration::from_secs(3));
    assert_eq!(config.context_entries, 5);
    assert_eq!(config.max_suggestions, 10);
    assert!(config.session_id.starts_with("call-"));
}

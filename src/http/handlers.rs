use super::state::AppState;
use crate::audio::decode_wav;
use crate::export::{self, ExportError};
use crate::providers::{build_advisor, build_transcriber, Provider};
use crate::session::{SessionError, SessionStats, SuggestionEntry, TranscriptEntry};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub status: String,
    pub stats: SessionStats,
}

#[derive(Debug, Deserialize)]
pub struct IngestAudioRequest {
    /// Base64-encoded WAV blob recorded or uploaded by the shell
    pub audio_b64: String,
}

#[derive(Debug, Serialize)]
pub struct IngestAudioResponse {
    /// Number of chunks now waiting in the upload queue
    pub queued: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProvidersRequest {
    pub transcription: Provider,
    pub suggestions: Provider,
}

#[derive(Debug, Serialize)]
pub struct UpdateProvidersResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Start a new call session
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut pipeline = state.pipeline.lock().await;

    match pipeline.start() {
        Ok(()) => {
            let session_id = pipeline.session_id().to_string();
            drop(pipeline);
            state.spawn_driver().await;

            info!("Session {} started via API", session_id);
            (
                StatusCode::OK,
                Json(StartSessionResponse {
                    session_id: session_id.clone(),
                    status: "recording".to_string(),
                    message: format!("Session {} started", session_id),
                }),
            )
                .into_response()
        }
        Err(SessionError::AlreadyActive) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A session is already recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /session/stop
/// Stop the active session (no-op when idle)
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut pipeline = state.pipeline.lock().await;
    let stats = pipeline.stop();

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            status: "stopped".to_string(),
            stats,
        }),
    )
}

/// GET /session/status
/// Current session statistics
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = state.pipeline.lock().await;
    (StatusCode::OK, Json(pipeline.stats()))
}

/// GET /session/transcript
/// Accumulated transcript entries
pub async fn session_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = state.pipeline.lock().await;
    let transcript: Vec<TranscriptEntry> = pipeline.transcript().to_vec();
    (StatusCode::OK, Json(transcript))
}

/// GET /session/suggestions
/// Retained suggestions (already truncated to the configured cap)
pub async fn session_suggestions(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = state.pipeline.lock().await;
    let suggestions: Vec<SuggestionEntry> = pipeline.suggestions().to_vec();
    (StatusCode::OK, Json(suggestions))
}

/// GET /session/export
/// Export the session as a structured JSON document
pub async fn export_session(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = state.pipeline.lock().await;

    match export::export(&pipeline) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(ExportError::NothingToExport) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "nothing to export".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to export session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /session/audio
/// Queue an uploaded audio blob as the next capture chunk
pub async fn ingest_audio(
    State(state): State<AppState>,
    Json(req): Json<IngestAudioRequest>,
) -> impl IntoResponse {
    let Some(queue) = state.uploads.as_ref() else {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Service is running with live microphone input".to_string(),
            }),
        )
            .into_response();
    };

    let bytes = match base64::engine::general_purpose::STANDARD.decode(&req.audio_b64) {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid base64 audio payload: {}", e),
                }),
            )
                .into_response();
        }
    };

    let chunk = match decode_wav(&bytes, state.sample_rate) {
        Ok(chunk) => chunk,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Could not decode audio: {}", e),
                }),
            )
                .into_response();
        }
    };

    let queued = match queue.lock() {
        Ok(mut pending) => {
            pending.push_back(chunk);
            pending.len()
        }
        Err(_) => 0,
    };

    (StatusCode::OK, Json(IngestAudioResponse { queued })).into_response()
}

/// POST /providers
/// Swap provider selection; rejected while a session is recording
pub async fn update_providers(
    State(state): State<AppState>,
    Json(req): Json<UpdateProvidersRequest>,
) -> impl IntoResponse {
    let transcriber = build_transcriber(req.transcription, req.transcription.credential());
    let advisor = build_advisor(req.suggestions, req.suggestions.credential());

    let mut pipeline = state.pipeline.lock().await;
    match pipeline.set_providers(transcriber, advisor) {
        Ok(()) => (
            StatusCode::OK,
            Json(UpdateProvidersResponse {
                status: "updated".to_string(),
                message: format!(
                    "Providers set: transcription={}, suggestions={}",
                    req.transcription, req.suggestions
                ),
            }),
        )
            .into_response(),
        Err(SessionError::AlreadyActive) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Cannot swap providers while a session is recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to update providers: {}", e),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

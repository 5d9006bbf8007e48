//! HTTP API for the presentation shell
//!
//! This module provides the REST API driving a call session:
//! - POST /session/start - Start recording
//! - POST /session/stop - Stop recording
//! - GET /session/status - Query session statistics
//! - GET /session/transcript - Get the accumulated transcript
//! - GET /session/suggestions - Get retained suggestions
//! - GET /session/export - Download the session export document
//! - POST /session/audio - Ingest an uploaded audio blob (upload input only)
//! - POST /providers - Swap provider selection between sessions
//! - GET /health - Health check
//!
//! Starting a session also spawns the tick driver that re-invokes the
//! pipeline roughly once per second while recording.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

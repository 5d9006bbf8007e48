//! Session export
//!
//! Serializes an accumulated session (transcript + suggestions) to the JSON
//! document consumed by downstream tooling. Field names are part of that
//! contract and must not change.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionPipeline;

/// Errors from session export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Both logs are empty; reported as a warning, not a failure
    #[error("nothing to export")]
    NothingToExport,

    #[error("failed to serialize session export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// The exported session document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_info: SessionInfo,
    pub transcript: Vec<ExportEntry>,
    pub suggestions: Vec<ExportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session start in ISO-8601, null if the session never started
    pub start_time: Option<String>,

    /// Export creation time in ISO-8601
    pub export_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Wall-clock time of the entry as HH:MM:SS
    pub timestamp: String,

    /// Entry text, verbatim
    pub text: String,
}

/// Build the export document for a session
///
/// Fails with `NothingToExport` when both logs are empty.
pub fn export(session: &SessionPipeline) -> Result<SessionExport, ExportError> {
    let transcript = session.transcript();
    let suggestions = session.suggestions();

    if transcript.is_empty() && suggestions.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    Ok(SessionExport {
        session_info: SessionInfo {
            start_time: session.started_at().map(|t| t.to_rfc3339()),
            export_time: Utc::now().to_rfc3339(),
        },
        transcript: transcript
            .iter()
            .map(|entry| ExportEntry {
                timestamp: clock_time(entry.timestamp),
                text: entry.text.clone(),
            })
            .collect(),
        suggestions: suggestions
            .iter()
            .map(|entry| ExportEntry {
                timestamp: clock_time(entry.timestamp),
                text: entry.text.clone(),
            })
            .collect(),
    })
}

impl SessionExport {
    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document into `dir` under a timestamped filename
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let filename = format!("sales_session_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(filename);
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

fn clock_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string()
}

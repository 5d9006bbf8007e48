use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a call session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (regenerated on each start)
    pub session_id: String,

    /// Wall-clock duration of audio drained per tick
    /// Default: 2 seconds
    pub chunk_duration: Duration,

    /// Minimum spacing between suggestion attempts
    /// Default: 3 seconds
    pub suggestion_interval: Duration,

    /// How many recent transcript entries feed the suggestion context window
    pub context_entries: usize,

    /// Retained suggestion count; older entries are dropped first
    pub max_suggestions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("call-{}", uuid::Uuid::new_v4()),
            chunk_duration: Duration::from_secs(2),
            suggestion_interval: Duration::from_secs(3),
            context_entries: 5,
            max_suggestions: 10,
        }
    }
}

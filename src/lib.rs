pub mod audio;
pub mod config;
pub mod export;
pub mod http;
pub mod providers;
pub mod session;

pub use audio::{
    AudioChunk, AudioError, AudioInput, AudioSource, AudioSourceConfig, AudioSourceFactory,
    ChunkAssembler, MicrophoneSource, UploadQueue, UploadSource,
};
pub use config::Config;
pub use export::{ExportError, SessionExport};
pub use http::{create_router, AppState};
pub use providers::{
    build_advisor, build_transcriber, Advisor, Provider, SuggestionError, Transcriber,
    TranscriptionError,
};
pub use session::{
    SessionConfig, SessionError, SessionPipeline, SessionStats, SuggestionEntry, TranscriptEntry,
};

pub mod capture;
pub mod chunk;
pub mod source;
pub mod upload;

pub use capture::MicrophoneSource;
pub use chunk::{encode_wav, AudioChunk, ChunkAssembler};
pub use source::{AudioError, AudioInput, AudioSource, AudioSourceConfig, AudioSourceFactory};
pub use upload::{decode_wav, UploadQueue, UploadSource};

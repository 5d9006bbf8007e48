use std::io::Cursor;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::warn;

use super::source::AudioError;

/// A WAV-framed unit of captured audio, handed whole to the transcription
/// provider and not retained afterwards.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// WAV-container bytes (16-bit PCM)
    pub bytes: Vec<u8>,
    /// Number of samples in the chunk
    pub sample_count: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioChunk {
    /// Frame raw mono samples into a WAV chunk
    pub fn from_samples(samples: &[i16], sample_rate: u32) -> Result<Self, AudioError> {
        let bytes = encode_wav(samples, sample_rate)?;
        Ok(Self {
            bytes,
            sample_count: samples.len(),
            sample_rate,
        })
    }

    /// Chunk duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.sample_count as f64 / self.sample_rate as f64
    }
}

/// Encode mono 16-bit PCM samples into an in-memory WAV container
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Assembles fixed-duration chunks from the capture frame queue
///
/// The capture callback is the producer; this is the sole consumer. Each
/// drain collects frames until the requested duration is covered or the
/// per-frame wait elapses, so a quiet queue yields a shorter chunk rather
/// than blocking the caller.
pub struct ChunkAssembler {
    frames: Receiver<Vec<i16>>,
    sample_rate: u32,
    frame_wait: Duration,
}

impl ChunkAssembler {
    pub fn new(frames: Receiver<Vec<i16>>, sample_rate: u32, frame_wait: Duration) -> Self {
        Self {
            frames,
            sample_rate,
            frame_wait,
        }
    }

    /// Drain buffered frames into a WAV chunk of up to `duration`
    ///
    /// Returns `None` when no frames were collected at all.
    pub fn assemble(&mut self, duration: Duration) -> Option<AudioChunk> {
        let target_samples = (duration.as_secs_f64() * self.sample_rate as f64) as usize;
        let mut samples: Vec<i16> = Vec::with_capacity(target_samples);

        while samples.len() < target_samples {
            match self.frames.recv_timeout(self.frame_wait) {
                Ok(frame) => samples.extend_from_slice(&frame),
                // Timeout or a closed producer: take what we have
                Err(_) => break,
            }
        }

        if samples.is_empty() {
            return None;
        }

        match AudioChunk::from_samples(&samples, self.sample_rate) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                warn!("Failed to encode audio chunk: {}", e);
                None
            }
        }
    }
}

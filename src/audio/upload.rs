use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hound::WavReader;
use tracing::{info, warn};

use super::chunk::AudioChunk;
use super::source::{AudioError, AudioSource};

/// Shared queue of pending uploaded chunks
///
/// The ingestion endpoint pushes; the session's `get_chunk` pops.
pub type UploadQueue = Arc<Mutex<VecDeque<AudioChunk>>>;

/// Audio source backed by uploaded or browser-recorded WAV blobs
///
/// Used in environments without microphone access; the chunk contract is
/// identical to live capture.
pub struct UploadSource {
    queue: UploadQueue,
    active: bool,
}

impl UploadSource {
    pub fn new() -> (Self, UploadQueue) {
        let queue: UploadQueue = Arc::new(Mutex::new(VecDeque::new()));
        let source = Self {
            queue: Arc::clone(&queue),
            active: false,
        };
        (source, queue)
    }
}

impl AudioSource for UploadSource {
    fn start(&mut self) -> Result<(), AudioError> {
        self.active = true;
        info!("Upload audio source ready");
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }

    fn get_chunk(&mut self, _duration: Duration) -> Option<AudioChunk> {
        if !self.active {
            return None;
        }
        self.queue.lock().ok()?.pop_front()
    }

    fn name(&self) -> &'static str {
        "upload"
    }
}

/// Decode an uploaded WAV blob into a capture-format chunk
///
/// Stereo input is downmixed and higher sample rates are decimated to the
/// target rate, so uploads feed the pipeline the same shape of chunk the
/// microphone does.
pub fn decode_wav(bytes: &[u8], target_sample_rate: u32) -> Result<AudioChunk, AudioError> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(AudioError::UnsupportedFormat(format!(
            "expected 16-bit PCM WAV, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

    let mono = match spec.channels {
        1 => samples,
        2 => stereo_to_mono(&samples),
        n => {
            return Err(AudioError::UnsupportedFormat(format!(
                "unsupported channel count: {}",
                n
            )))
        }
    };

    let (resampled, rate) = downsample(mono, spec.sample_rate, target_sample_rate);

    info!(
        "Decoded uploaded audio: {} samples at {} Hz",
        resampled.len(),
        rate
    );

    AudioChunk::from_samples(&resampled, rate)
}

/// Convert stereo to mono by summing channels with clipping
fn stereo_to_mono(samples: &[i16]) -> Vec<i16> {
    let mut mono = Vec::with_capacity(samples.len() / 2);
    for pair in samples.chunks_exact(2) {
        let sum = pair[0] as i32 + pair[1] as i32;
        mono.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
    }
    mono
}

/// Downsample by decimation; non-integer ratios and upsampling pass through
fn downsample(samples: Vec<i16>, rate: u32, target_rate: u32) -> (Vec<i16>, u32) {
    if rate == target_rate {
        return (samples, rate);
    }

    let ratio = rate / target_rate;
    if ratio <= 1 {
        warn!(
            "Cannot decimate {} Hz to {} Hz, passing audio through unchanged",
            rate, target_rate
        );
        return (samples, rate);
    }

    let decimated: Vec<i16> = samples.iter().step_by(ratio as usize).copied().collect();
    (decimated, target_rate)
}

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::JoinHandle;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleRate;
use tracing::{debug, error, info};

use super::chunk::{AudioChunk, ChunkAssembler};
use super::source::{AudioError, AudioSource, AudioSourceConfig};

/// Captures audio from the default input device
///
/// The cpal stream lives on a dedicated capture thread (cpal streams are not
/// `Send`); its callback pushes i16 frames into a bounded queue. The tick
/// loop drains that queue through `get_chunk`, which is the only consumer.
pub struct MicrophoneSource {
    config: AudioSourceConfig,
    assembler: Option<ChunkAssembler>,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl MicrophoneSource {
    pub fn new(config: AudioSourceConfig) -> Self {
        Self {
            config,
            assembler: None,
            shutdown: None,
            worker: None,
        }
    }
}

impl AudioSource for MicrophoneSource {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (frame_tx, frame_rx) = mpsc::sync_channel(self.config.queue_capacity);
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let config = self.config.clone();
        let worker = std::thread::spawn(move || {
            capture_worker(&config, frame_tx, &ready_tx, &shutdown_rx);
        });

        // The worker reports back once the stream is playing (or failed to open).
        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.assembler = Some(ChunkAssembler::new(
                    frame_rx,
                    self.config.sample_rate,
                    self.config.frame_wait,
                ));
                self.shutdown = Some(shutdown_tx);
                self.worker = Some(worker);
                info!("Microphone capture started ({} Hz mono)", self.config.sample_rate);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(AudioError::Device(
                    "capture thread exited before the stream was ready".to_string(),
                ))
            }
        }
    }

    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            info!("Microphone capture stopped");
        }
        self.assembler = None;
    }

    fn get_chunk(&mut self, duration: Duration) -> Option<AudioChunk> {
        self.assembler.as_mut()?.assemble(duration)
    }

    fn name(&self) -> &'static str {
        "microphone"
    }
}

impl Drop for MicrophoneSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the cpal stream for the lifetime of a capture session
fn capture_worker(
    config: &AudioSourceConfig,
    frames: SyncSender<Vec<i16>>,
    ready: &Sender<Result<(), AudioError>>,
    shutdown: &Receiver<()>,
) {
    let stream = match open_input_stream(config, frames) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready.send(Err(AudioError::Device(e.to_string())));
        return;
    }

    let _ = ready.send(Ok(()));

    // Block until stop() signals or the source is dropped.
    let _ = shutdown.recv();
    drop(stream);
}

fn open_input_stream(
    config: &AudioSourceConfig,
    frames: SyncSender<Vec<i16>>,
) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or_else(|| AudioError::Device("no input device available".to_string()))?;

    let supported = device
        .supported_input_configs()
        .map_err(|e| AudioError::Device(e.to_string()))?
        .find(|c| {
            c.channels() == config.channels
                && c.min_sample_rate() <= SampleRate(config.sample_rate)
                && c.max_sample_rate() >= SampleRate(config.sample_rate)
        })
        .ok_or_else(|| {
            AudioError::Device(format!(
                "no input config supporting {} Hz / {} channel(s)",
                config.sample_rate, config.channels
            ))
        })?;

    let stream_config = supported
        .with_sample_rate(SampleRate(config.sample_rate))
        .config();

    debug!(
        "Opening input device {} at {} Hz",
        device.name().unwrap_or_default(),
        config.sample_rate
    );

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let frame: Vec<i16> = data
                    .iter()
                    .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
                    .collect();
                // A full queue means the tick loop is behind; the frame is dropped.
                let _ = frames.try_send(frame);
            },
            |err| {
                error!("Audio capture stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::Device(e.to_string()))?;

    Ok(stream)
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::audio::UploadQueue;
use crate::session::SessionPipeline;

/// How often the driver re-invokes the pipeline while recording
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single session pipeline; the mutex serializes ticks with
    /// start/stop so the pipeline is never entered concurrently
    pub pipeline: Arc<Mutex<SessionPipeline>>,

    /// Push side of the upload queue when running with the upload input
    pub uploads: Option<UploadQueue>,

    /// Capture sample rate, used to normalize uploaded audio
    pub sample_rate: u32,

    driver: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(pipeline: SessionPipeline, uploads: Option<UploadQueue>, sample_rate: u32) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
            uploads,
            sample_rate,
            driver: Arc::new(Mutex::new(None)),
        }
    }

    /// Spawn the tick driver for a freshly started session
    ///
    /// Any previous driver is torn down first; the new one exits on its own
    /// once the session is no longer recording.
    pub async fn spawn_driver(&self) {
        let mut guard = self.driver.lock().await;
        if let Some(previous) = guard.take() {
            previous.abort();
        }

        let pipeline = Arc::clone(&self.pipeline);
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_PERIOD);
            // A slow provider call should delay the next tick, not burst it.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let mut session = pipeline.lock().await;
                if !session.is_recording() {
                    break;
                }
                session.tick().await;
            }
        }));
    }
}

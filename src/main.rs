use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use call_assist::audio::{AudioSourceConfig, AudioSourceFactory};
use call_assist::providers::{build_advisor, build_transcriber};
use call_assist::session::{SessionConfig, SessionPipeline};
use call_assist::{create_router, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "call-assist", about = "Live call assistant: chunked transcription with AI suggestions")]
struct Args {
    /// Config file path, without extension
    #[arg(long, default_value = "config/call-assist")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Could not load config {}: {} (using defaults)", args.config, e);
            Config::default()
        }
    };

    info!("{} v0.1.0", cfg.service.name);

    // Credentials are read once here; a missing key selects placeholder mode.
    let transcriber = build_transcriber(
        cfg.providers.transcription,
        cfg.providers.transcription.credential(),
    );
    let advisor = build_advisor(
        cfg.providers.suggestions,
        cfg.providers.suggestions.credential(),
    );
    info!(
        "Providers: transcription={}, suggestions={}",
        transcriber.name(),
        advisor.name()
    );

    let source_config = AudioSourceConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        queue_capacity: cfg.audio.queue_capacity,
        frame_wait: Duration::from_millis(cfg.audio.frame_wait_ms),
    };
    let (source, uploads) = AudioSourceFactory::create(cfg.audio.input, source_config);
    info!("Audio input: {}", source.name());

    let session_config = SessionConfig {
        chunk_duration: Duration::from_secs(cfg.audio.chunk_duration_secs),
        suggestion_interval: Duration::from_secs(cfg.pipeline.suggestion_interval_secs),
        context_entries: cfg.pipeline.context_entries,
        max_suggestions: cfg.pipeline.max_suggestions,
        ..SessionConfig::default()
    };

    let pipeline = SessionPipeline::new(session_config, source, transcriber, advisor);
    let state = AppState::new(pipeline, uploads, cfg.audio.sample_rate);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Result;
use serde::Deserialize;

use crate::audio::AudioInput;
use crate::providers::Provider;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub pipeline: PipelineConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub input: AudioInput,
    pub sample_rate: u32,
    pub channels: u16,
    pub queue_capacity: usize,
    pub frame_wait_ms: u64,
    pub chunk_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub suggestion_interval_secs: u64,
    pub context_entries: usize,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    pub transcription: Provider,
    pub suggestions: Provider,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "call-assist".to_string(),
                http: HttpConfig {
                    bind: "127.0.0.1".to_string(),
                    port: 8787,
                },
            },
            audio: AudioConfig {
                input: AudioInput::Microphone,
                sample_rate: 16000,
                channels: 1,
                queue_capacity: 64,
                frame_wait_ms: 100,
                chunk_duration_secs: 2,
            },
            pipeline: PipelineConfig {
                suggestion_interval_secs: 3,
                context_entries: 5,
                max_suggestions: 10,
            },
            providers: ProvidersConfig {
                transcription: Provider::Groq,
                suggestions: Provider::Groq,
            },
        }
    }
}

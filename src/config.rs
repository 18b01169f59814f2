use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub telephony: TelephonyConfig,
    pub recognition: RecognitionConfig,
    pub model: ModelConfig,
    pub store: StoreConfig,
    pub interview: InterviewConfig,
    pub transcripts: TranscriptsConfig,
    pub candidate: CandidateConfig,
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

/// Credentials and routing for the telephony provider's REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct TelephonyConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Provider phone number outbound calls originate from.
    pub phone_number: String,
    /// Webhook URL the provider fetches to answer a placed call.
    pub voice_url: String,
}

/// Streaming speech-recognition channel settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    pub url: String,
    pub api_key: String,
    /// Keep-alive ping cadence on the recognition socket, in seconds.
    pub ping_interval_secs: u64,
    /// The channel is torn down after this long without any inbound message.
    pub silence_timeout_secs: u64,
}

/// Generative model endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub api_key: String,
    /// Per-request timeout in seconds; a slow completion skips the turn
    /// rather than stalling the call.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub database: String,
    pub collection: String,
}

/// The interviewer persona embedded in every prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    pub agent_name: String,
    pub company: String,
    pub job_role: String,
    pub resume_summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptsConfig {
    /// Directory durable per-session transcripts are written into.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateConfig {
    /// Path to the read-only candidate profile JSON.
    pub path: String,
}

impl Config {
    /// Load configuration from a file, with environment variables layered
    /// on top for secrets (e.g. `CALLSCREEN__RECOGNITION__API_KEY`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CALLSCREEN").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;

/// Read-only candidate profile consumed by the dialer and the scoring
/// handoff. The identifier is the idempotency key for the score record.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateProfile {
    #[serde(rename = "UID")]
    pub uid: String,

    #[serde(rename = "Phone")]
    pub phone: Option<String>,
}

impl CandidateProfile {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read candidate profile {}", path))?;

        serde_json::from_str(&raw).context("Failed to parse candidate profile")
    }
}

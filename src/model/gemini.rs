use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CompletionModel;
use crate::config::ModelConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini `generateContent` REST client.
pub struct GeminiModel {
    http: reqwest::Client,
    config: ModelConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build model HTTP client")?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl CompletionModel for GeminiModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.config.name, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Model request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Model request rejected ({}): {}", status, body);
        }

        let decoded: GenerateResponse = resp
            .json()
            .await
            .context("Failed to decode model response")?;

        let text = decoded
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("Model returned an empty completion");
        }

        Ok(text)
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::config::TelephonyConfig;

/// Subset of the provider response for a created call.
#[derive(Debug, Deserialize)]
struct CallCreated {
    sid: String,
}

/// REST client for placing the outbound screening call.
pub struct Dialer {
    http: reqwest::Client,
    config: TelephonyConfig,
}

impl Dialer {
    pub fn new(config: TelephonyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build dialer HTTP client")?;

        Ok(Self { http, config })
    }

    /// Place an outbound call to `to`, answered with the configured voice
    /// document. Returns the provider-assigned call sid.
    pub async fn dial(&self, to: &str) -> Result<String> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Calls.json",
            self.config.account_sid
        );

        let params = [
            ("To", to),
            ("From", self.config.phone_number.as_str()),
            ("Url", self.config.voice_url.as_str()),
        ];

        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .context("Failed to send call-creation request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Call creation rejected ({}): {}", status, body);
        }

        let created: CallCreated = resp
            .json()
            .await
            .context("Failed to decode call-creation response")?;

        info!("Outbound call initiated: {}", created.sid);

        Ok(created.sid)
    }
}

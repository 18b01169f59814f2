use anyhow::{Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Inbound control/media event on the telephony stream.
///
/// Decoded exactly once at the socket boundary. Unrecognized event tags and
/// frames with missing fields fail deserialization; the relay logs and drops
/// them without ending the call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyEvent {
    /// Stream opened; carries the provider-assigned stream id.
    Start { start: StreamStart },
    /// One frame of caller audio.
    Media { media: MediaPayload },
    /// Stream closed by the provider.
    Stop,
}

impl TelephonyEvent {
    /// Decode one text frame from the telephony socket.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Unrecognized telephony event")
    }
}

/// Metadata attached to a `start` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStart {
    /// Opaque stream identifier; becomes the session id.
    pub stream_sid: String,
    #[serde(default)]
    pub call_sid: Option<String>,
}

/// Audio carried by a `media` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    /// Base64-encoded audio bytes, forwarded to recognition unmodified.
    pub payload: String,
    /// Presentation timestamp in milliseconds since stream start.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MediaPayload {
    /// Decode the audio bytes. A payload that does not decode marks the
    /// whole event malformed.
    pub fn decode_audio(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.payload)
            .context("Undecodable media payload")
    }

    /// Timestamp parsed to milliseconds, if present and well-formed.
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.timestamp.as_deref().and_then(|t| t.parse().ok())
    }
}

/// Outbound message sent back over the telephony stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyOutbound {
    /// Agent audio/text for playback, correlated to the active stream.
    Media {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        media: OutboundPayload,
    },
}

/// Payload half of an outbound media event.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundPayload {
    pub payload: String,
}

impl TelephonyOutbound {
    /// Wrap agent text as a media event for the bound stream.
    pub fn media_from_text(stream_sid: &str, text: &str) -> Self {
        Self::Media {
            stream_sid: stream_sid.to_string(),
            media: OutboundPayload {
                payload: base64::engine::general_purpose::STANDARD.encode(text.as_bytes()),
            },
        }
    }

    /// Serialize for the socket. Infallible in practice; surfaced as a
    /// `Result` so the writer task can log rather than panic.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize outbound media")
    }
}

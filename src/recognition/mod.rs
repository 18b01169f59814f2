//! Speech-recognition channel: WebSocket client and inbound protocol.
//!
//! The connection is established before the session activates (fail fast
//! when the recognizer is unreachable) and split into a sink half that
//! forwards caller audio and a stream half the consumer loop reads.

mod client;
pub mod messages;

pub use client::{RecognitionClient, RecognitionStream, RecognitionWriter};
pub use messages::{RecognitionMessage, ResultsPayload};

use anyhow::Result;
use async_trait::async_trait;

/// Outbound half of the recognition channel as seen by the media relay.
/// Tests substitute a recording double.
#[async_trait]
pub trait RecognitionSink: Send + Sync {
    /// Forward one frame of caller audio, unmodified.
    async fn send_audio(&self, audio: Vec<u8>) -> Result<()>;

    /// Keep-alive ping; keeps the recognizer from dropping a quiet call.
    async fn keepalive(&self) -> Result<()>;

    /// Close the channel; further sends fail.
    async fn close(&self) -> Result<()>;
}

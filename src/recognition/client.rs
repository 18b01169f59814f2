use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use super::RecognitionSink;
use crate::config::RecognitionConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct RecognitionClient;

impl RecognitionClient {
    /// Open the recognition channel. A connection failure here is fatal
    /// for the session: it is surfaced before bootstrap ever runs.
    pub async fn connect(
        config: &RecognitionConfig,
    ) -> Result<(RecognitionWriter, RecognitionStream)> {
        info!("Connecting to recognition channel at {}", config.url);

        let mut request = config
            .url
            .as_str()
            .into_client_request()
            .context("Invalid recognition channel URL")?;

        request.headers_mut().insert(
            AUTHORIZATION,
            format!("Token {}", config.api_key)
                .parse()
                .context("Invalid recognition API key")?,
        );

        let (socket, _) = connect_async(request)
            .await
            .context("Failed to connect to recognition channel")?;

        info!("Recognition channel connected");

        let (sink, stream) = socket.split();

        Ok((
            RecognitionWriter {
                sink: Mutex::new(sink),
            },
            RecognitionStream { stream },
        ))
    }
}

/// Outbound half: caller audio and keep-alive pings. The sink is behind a
/// lock because the relay and the keep-alive task both write.
pub struct RecognitionWriter {
    sink: Mutex<SplitSink<WsStream, Message>>,
}

#[async_trait]
impl RecognitionSink for RecognitionWriter {
    async fn send_audio(&self, audio: Vec<u8>) -> Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Binary(audio))
            .await
            .context("Failed to forward audio to recognition")
    }

    async fn keepalive(&self) -> Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Ping(Vec::new()))
            .await
            .context("Recognition keep-alive failed")
    }

    async fn close(&self) -> Result<()> {
        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.send(Message::Close(None)).await {
            warn!("Recognition channel close failed: {}", e);
        }
        Ok(())
    }
}

/// Inbound half: JSON result messages, read by the consumer loop.
pub struct RecognitionStream {
    stream: SplitStream<WsStream>,
}

impl RecognitionStream {
    /// Next text frame, skipping protocol chatter. `None` means the
    /// channel closed or errored; the consumer loop stops silently.
    pub async fn next_text(&mut self) -> Option<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(text),
                Some(Ok(Message::Close(_))) => return None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("Recognition channel error: {}", e);
                    return None;
                }
                None => return None,
            }
        }
    }
}

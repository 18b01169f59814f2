// Replay a canned call against a running callscreen server.
//
// Prerequisites:
// 1. `callscreen serve` running locally (default port 5050)
// 2. A reachable recognition channel and model API key in the environment
//
// Usage: cargo run --example replay_call [ws://host:port/media-stream]
//
// Sends a start event, a few frames of audio, then stop, printing every
// agent response the server emits along the way.

use anyhow::Result;
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://localhost:5050/media-stream".to_string());

    println!("Connecting to {}", url);
    let (socket, _) = connect_async(&url).await?;
    let (mut tx, mut rx) = socket.split();

    tx.send(Message::Text(
        r#"{"event":"start","start":{"streamSid":"demo-1"}}"#.to_string(),
    ))
    .await?;

    for (i, chunk) in [b"demo audio one", b"demo audio two"].iter().enumerate() {
        let payload = base64::engine::general_purpose::STANDARD.encode(chunk);
        let frame = format!(
            r#"{{"event":"media","media":{{"payload":"{}","timestamp":"{}"}}}}"#,
            payload,
            (i + 1) * 20
        );
        tx.send(Message::Text(frame)).await?;
    }

    // Print agent responses for a while, then hang up.
    let listen = async {
        while let Some(Ok(Message::Text(text))) = rx.next().await {
            let value: Value = serde_json::from_str(&text)?;
            if value["event"] == "media" {
                let payload = value["media"]["payload"].as_str().unwrap_or_default();
                let decoded = base64::engine::general_purpose::STANDARD.decode(payload)?;
                println!("agent: {}", String::from_utf8_lossy(&decoded));
            }
        }
        Ok::<_, anyhow::Error>(())
    };

    if timeout(Duration::from_secs(15), listen).await.is_err() {
        println!("Done listening; hanging up");
    }

    tx.send(Message::Text(r#"{"event":"stop"}"#.to_string()))
        .await?;
    tx.send(Message::Close(None)).await?;

    Ok(())
}

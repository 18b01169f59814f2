use std::sync::Arc;
use std::sync::OnceLock;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::telephony::TelephonyOutbound;

/// Encodes agent text and funnels it toward the telephony socket's single
/// writer task.
///
/// Nothing is sent while no stream id is bound: the generative model can
/// finish the bootstrap greeting before the `start` event arrives, so
/// early responses are queued and replayed once binding completes.
pub struct ResponseEmitter {
    stream_sid: Arc<OnceLock<String>>,
    out_tx: mpsc::Sender<String>,
    pending: Mutex<Vec<String>>,
    last_agent_item: Mutex<Option<String>>,
}

impl ResponseEmitter {
    pub fn new(stream_sid: Arc<OnceLock<String>>, out_tx: mpsc::Sender<String>) -> Self {
        Self {
            stream_sid,
            out_tx,
            pending: Mutex::new(Vec::new()),
            last_agent_item: Mutex::new(None),
        }
    }

    /// Send agent text over the telephony channel, or queue it if the
    /// stream id is not bound yet.
    pub async fn send(&self, text: &str) {
        match self.stream_sid.get() {
            Some(sid) => self.dispatch(sid, text).await,
            None => {
                info!("Stream id not bound yet; queueing agent response");
                let mut pending = self.pending.lock().await;
                pending.push(text.to_string());
            }
        }
    }

    /// Replay responses queued before the stream id was bound. Called on
    /// the AWAITING_START→ACTIVE transition.
    pub async fn replay_pending(&self) {
        let queued: Vec<String> = {
            let mut pending = self.pending.lock().await;
            std::mem::take(&mut *pending)
        };

        if queued.is_empty() {
            return;
        }

        let Some(sid) = self.stream_sid.get() else {
            warn!("Replay requested with no stream id bound; dropping queued responses");
            return;
        };

        for text in queued {
            self.dispatch(sid, &text).await;
        }
    }

    /// Identifier of the most recently emitted agent utterance.
    pub async fn last_agent_item(&self) -> Option<String> {
        self.last_agent_item.lock().await.clone()
    }

    async fn dispatch(&self, stream_sid: &str, text: &str) {
        let envelope = TelephonyOutbound::media_from_text(stream_sid, text);

        let frame = match envelope.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping agent response: {}", e);
                return;
            }
        };

        if self.out_tx.send(frame).await.is_err() {
            warn!("Telephony writer gone; dropping agent response");
            return;
        }

        let mut last = self.last_agent_item.lock().await;
        *last = Some(uuid::Uuid::new_v4().to_string());
    }
}

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};

use super::state::Lifecycle;
use crate::recognition::RecognitionSink;
use crate::telephony::TelephonyEvent;

/// What the session loop should do after one relayed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `start` accepted; stream id is now bound and the session is active.
    Bound,
    /// Audio forwarded to recognition.
    Forwarded,
    /// Event logged and dropped; the call continues.
    Dropped,
    /// `stop` received; begin finalize.
    Stop,
    /// Protocol violation (duplicate `start`); fail the session.
    Fault,
}

/// Forwards inbound telephony events to the recognition channel and keeps
/// the session's stream identity and media clock.
pub struct MediaRelay {
    lifecycle: Arc<Lifecycle>,
    stream_sid: Arc<OnceLock<String>>,
    last_media_ms: Arc<AtomicU64>,
    frames_relayed: Arc<AtomicUsize>,
    sink: Arc<dyn RecognitionSink>,
}

impl MediaRelay {
    pub fn new(
        lifecycle: Arc<Lifecycle>,
        stream_sid: Arc<OnceLock<String>>,
        last_media_ms: Arc<AtomicU64>,
        frames_relayed: Arc<AtomicUsize>,
        sink: Arc<dyn RecognitionSink>,
    ) -> Self {
        Self {
            lifecycle,
            stream_sid,
            last_media_ms,
            frames_relayed,
            sink,
        }
    }

    /// Handle one decoded telephony event, in arrival order.
    pub async fn handle_event(&self, event: TelephonyEvent) -> RelayOutcome {
        match event {
            TelephonyEvent::Start { start } => {
                if self.stream_sid.set(start.stream_sid.clone()).is_err() {
                    error!(
                        "Duplicate start event (stream id already bound); failing session"
                    );
                    return RelayOutcome::Fault;
                }

                if !self.lifecycle.activate() {
                    error!("Start event in non-initial state; failing session");
                    return RelayOutcome::Fault;
                }

                info!("Stream started: {}", start.stream_sid);
                RelayOutcome::Bound
            }

            TelephonyEvent::Media { media } => {
                if !self.lifecycle.is_active() {
                    warn!("Media event with no active stream; dropping");
                    return RelayOutcome::Dropped;
                }

                let audio = match media.decode_audio() {
                    Ok(audio) => audio,
                    Err(e) => {
                        warn!("Malformed media event: {}", e);
                        return RelayOutcome::Dropped;
                    }
                };

                // The clock never moves backward; out-of-order frames are
                // accepted but do not rewind it.
                if let Some(ts) = media.timestamp_ms() {
                    self.last_media_ms.fetch_max(ts, Ordering::SeqCst);
                }

                if let Err(e) = self.sink.send_audio(audio).await {
                    warn!("Audio forward failed: {}", e);
                    return RelayOutcome::Dropped;
                }

                self.frames_relayed.fetch_add(1, Ordering::SeqCst);
                RelayOutcome::Forwarded
            }

            TelephonyEvent::Stop => {
                info!("Stream ended");
                RelayOutcome::Stop
            }
        }
    }
}

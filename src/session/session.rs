use super::consumer::{ConsumerOutcome, RecognitionConsumer};
use super::emitter::ResponseEmitter;
use super::relay::{MediaRelay, RelayOutcome};
use super::state::{Lifecycle, LifecycleState};
use super::stats::SessionStats;
use super::transcript::{TranscriptLog, TranscriptTurn, TranscriptWriter};
use super::SessionRegistry;
use crate::config::{InterviewConfig, RecognitionConfig};
use crate::dialogue::TurnEngine;
use crate::model::CompletionModel;
use crate::recognition::{RecognitionSink, RecognitionStream};
use crate::scoring;
use crate::store::ScreenStore;
use crate::telephony::TelephonyEvent;
use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Everything a session needs from the outside world. Trait objects at
/// every seam so tests can drive a session with doubles.
pub struct SessionDeps {
    pub sink: Arc<dyn RecognitionSink>,
    pub model: Arc<dyn CompletionModel>,
    pub store: Arc<dyn ScreenStore>,
    pub writer: Arc<TranscriptWriter>,
    pub interview: InterviewConfig,
    pub candidate_uid: String,
}

/// What the telephony loop should do after one processed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Continue,
    /// Stop received or protocol fault; finalize and close.
    End,
}

/// One phone call's orchestrated state, from stream start to finalize.
///
/// Owns the lifecycle, the stream identity, the transcript, and the two
/// duplex loops. Finalize-and-score runs at most once regardless of how
/// the call ends.
pub struct CallSession {
    created_at: chrono::DateTime<Utc>,
    lifecycle: Arc<Lifecycle>,
    stream_sid: Arc<OnceLock<String>>,
    transcript: Arc<TranscriptLog>,
    last_media_ms: Arc<AtomicU64>,
    frames_relayed: Arc<AtomicUsize>,
    emitter: Arc<ResponseEmitter>,
    engine: Arc<TurnEngine>,
    relay: MediaRelay,
    consumer: RecognitionConsumer,
    model: Arc<dyn CompletionModel>,
    store: Arc<dyn ScreenStore>,
    writer: Arc<TranscriptWriter>,
    sink: Arc<dyn RecognitionSink>,
    candidate_uid: String,

    /// Signals both loops to stop reading on finalize.
    shutdown: watch::Sender<bool>,

    /// Outbound frame receiver, taken by the writer task in `run`.
    out_rx: Mutex<Option<mpsc::Receiver<String>>>,
}

impl CallSession {
    pub fn new(deps: SessionDeps) -> Self {
        let lifecycle = Arc::new(Lifecycle::new());
        let stream_sid = Arc::new(OnceLock::new());
        let transcript = Arc::new(TranscriptLog::new());
        let last_media_ms = Arc::new(AtomicU64::new(0));
        let frames_relayed = Arc::new(AtomicUsize::new(0));

        let (out_tx, out_rx) = mpsc::channel(64);
        let (shutdown, _) = watch::channel(false);

        let emitter = Arc::new(ResponseEmitter::new(Arc::clone(&stream_sid), out_tx));

        let engine = Arc::new(TurnEngine::new(
            Arc::clone(&deps.model),
            Arc::clone(&transcript),
            Arc::clone(&emitter),
            Arc::clone(&lifecycle),
            deps.interview,
        ));

        let relay = MediaRelay::new(
            Arc::clone(&lifecycle),
            Arc::clone(&stream_sid),
            Arc::clone(&last_media_ms),
            Arc::clone(&frames_relayed),
            Arc::clone(&deps.sink),
        );

        let consumer = RecognitionConsumer::new(Arc::clone(&engine));

        Self {
            created_at: Utc::now(),
            lifecycle,
            stream_sid,
            transcript,
            last_media_ms,
            frames_relayed,
            emitter,
            engine,
            relay,
            consumer,
            model: deps.model,
            store: deps.store,
            writer: deps.writer,
            sink: deps.sink,
            candidate_uid: deps.candidate_uid,
            shutdown,
            out_rx: Mutex::new(Some(out_rx)),
        }
    }

    /// Process one decoded telephony event. Binding triggers the
    /// bootstrap greeting and replays any queued responses.
    pub async fn process_event(&self, event: TelephonyEvent) -> SessionFlow {
        match self.relay.handle_event(event).await {
            RelayOutcome::Bound => {
                self.engine.bootstrap().await;
                self.emitter.replay_pending().await;
                SessionFlow::Continue
            }
            RelayOutcome::Forwarded | RelayOutcome::Dropped => SessionFlow::Continue,
            RelayOutcome::Stop | RelayOutcome::Fault => SessionFlow::End,
        }
    }

    /// Process one raw recognition message. Finalized results run a
    /// dialogue turn; everything else is ignored or dropped.
    pub async fn handle_recognition_text(&self, text: &str) -> ConsumerOutcome {
        self.consumer.handle_message(text).await
    }

    /// Flush the transcript, run the scoring handoff, and close.
    ///
    /// Safe to call any number of times: only the caller that wins the
    /// ACTIVE→FINALIZING transition performs the flush and handoff. A
    /// session that never activated closes without either.
    pub async fn finalize(&self) {
        if self.lifecycle.begin_finalize() {
            let turns = self.transcript.snapshot().await;

            // Bound is a precondition of ACTIVE, so the sid is present.
            if let Some(sid) = self.stream_sid.get() {
                match self.writer.flush(sid, &turns) {
                    Ok(path) => info!("Transcript flushed to {:?}", path),
                    Err(e) => error!("Transcript flush failed: {}", e),
                }
            }

            if let Err(e) = scoring::review_and_record(
                self.model.as_ref(),
                self.store.as_ref(),
                &self.candidate_uid,
                &turns,
            )
            .await
            {
                error!("Scoring handoff failed: {}", e);
            }
        }

        self.lifecycle.close();
        let _ = self.shutdown.send(true);

        if let Err(e) = self.sink.close().await {
            warn!("Recognition channel close failed: {}", e);
        }
    }

    /// Drive the session over a live telephony socket and recognition
    /// stream until the call ends, then finalize.
    pub async fn run(
        self: Arc<Self>,
        socket: WebSocket,
        mut recognition: RecognitionStream,
        registry: SessionRegistry,
        recognition_cfg: RecognitionConfig,
    ) {
        let (mut ws_tx, mut ws_rx) = socket.split();

        // Single writer task funnels all outbound frames to the socket.
        let mut out_rx = {
            let mut slot = self.out_rx.lock().await;
            match slot.take() {
                Some(rx) => rx,
                None => {
                    error!("Session already ran; refusing to run twice");
                    return;
                }
            }
        };

        let writer_task = tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                if let Err(e) = ws_tx.send(Message::Text(frame)).await {
                    warn!("Telephony write failed: {}", e);
                    break;
                }
            }
        });

        // Keep-alive pings keep the recognizer from dropping a quiet call.
        let keepalive_task = {
            let sink = Arc::clone(&self.sink);
            let mut shutdown_rx = self.shutdown.subscribe();
            let interval = Duration::from_secs(recognition_cfg.ping_interval_secs);

            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = shutdown_rx.changed() => break,
                        _ = ticker.tick() => {
                            if sink.keepalive().await.is_err() {
                                break;
                            }
                        }
                    }
                }
            })
        };

        // Recognition loop: finalized results become dialogue turns. A
        // closed or silent channel stops this loop, never the call.
        let recognition_task = {
            let consumer = self.consumer.clone();
            let mut shutdown_rx = self.shutdown.subscribe();
            let silence = Duration::from_secs(recognition_cfg.silence_timeout_secs);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown_rx.changed() => break,
                        next = timeout(silence, recognition.next_text()) => match next {
                            Ok(Some(text)) => {
                                consumer.handle_message(&text).await;
                            }
                            Ok(None) => {
                                info!("Recognition channel closed; no further caller speech");
                                break;
                            }
                            Err(_) => {
                                warn!("Recognition channel silent past keep-alive bound; tearing down");
                                break;
                            }
                        },
                    }
                }
            })
        };

        // Telephony loop, inline: decode once at the boundary, relay in
        // arrival order. A socket close while active ends the call the
        // same way a stop event does.
        let mut registered = false;

        while let Some(msg) = ws_rx.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("Telephony socket error: {}", e);
                    break;
                }
            };

            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => {
                    info!("Telephony socket closed by peer");
                    break;
                }
                _ => continue,
            };

            let event = match TelephonyEvent::parse(&text) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Malformed telephony event dropped: {}", e);
                    continue;
                }
            };

            let flow = self.process_event(event).await;

            if !registered {
                if let Some(sid) = self.stream_sid.get() {
                    let mut sessions = registry.write().await;
                    sessions.insert(sid.clone(), Arc::clone(&self));
                    registered = true;
                }
            }

            if flow == SessionFlow::End {
                break;
            }
        }

        self.finalize().await;

        if let Some(sid) = self.stream_sid.get() {
            let mut sessions = registry.write().await;
            sessions.remove(sid);
        }

        // Shutdown was signalled in finalize; the supervised loops exit on
        // their own. Nothing outbound matters once the session is closed.
        writer_task.abort();

        for (name, task) in [
            ("keepalive", keepalive_task),
            ("recognition", recognition_task),
        ] {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("{} task panicked: {}", name, e);
                }
            }
        }

        info!("Session closed");
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.current()
    }

    pub fn stream_sid(&self) -> Option<&str> {
        self.stream_sid.get().map(|s| s.as_str())
    }

    /// Identifier of the most recently emitted agent utterance.
    pub async fn last_agent_item(&self) -> Option<String> {
        self.emitter.last_agent_item().await
    }

    /// Ordered copy of the transcript accumulated so far.
    pub async fn transcript_snapshot(&self) -> Vec<TranscriptTurn> {
        self.transcript.snapshot().await
    }

    /// Snapshot for the status endpoint.
    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.created_at);

        SessionStats {
            state: self.lifecycle.current().label().to_string(),
            stream_sid: self.stream_sid.get().cloned(),
            started_at: self.created_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            frames_relayed: self.frames_relayed.load(Ordering::SeqCst),
            media_clock_ms: self.last_media_ms.load(Ordering::SeqCst),
            turn_count: self.transcript.len().await,
        }
    }
}

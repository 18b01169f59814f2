//! Per-call session orchestration.
//!
//! This module is the core of the service: one `CallSession` per media
//! stream, holding:
//! - the lifecycle state machine with its exactly-once finalize guard
//! - the append-only transcript log and its durable writer
//! - the media ingest relay (telephony → recognition)
//! - the recognition consumer (finalized results → dialogue turns)
//! - the response emitter (agent text → telephony)

mod consumer;
mod emitter;
mod relay;
mod session;
mod state;
mod stats;
mod transcript;

pub use consumer::{ConsumerOutcome, RecognitionConsumer};
pub use emitter::ResponseEmitter;
pub use relay::{MediaRelay, RelayOutcome};
pub use session::{CallSession, SessionDeps, SessionFlow};
pub use state::{Lifecycle, LifecycleState};
pub use stats::SessionStats;
pub use transcript::{DurableTurn, Role, TranscriptLog, TranscriptTurn, TranscriptWriter};

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Active sessions keyed by stream id. Sessions register themselves on
/// binding and deregister at close.
pub type SessionRegistry = Arc<RwLock<HashMap<String, Arc<CallSession>>>>;

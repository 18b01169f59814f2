use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one call session, served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Lifecycle state label.
    pub state: String,

    /// Bound stream id, once a `start` event has been processed.
    pub stream_sid: Option<String>,

    /// When the session was created.
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_secs: f64,

    /// Audio frames forwarded to recognition so far.
    pub frames_relayed: usize,

    /// Last-seen media timestamp, milliseconds since stream start.
    pub media_clock_ms: u64,

    /// Transcript turns accumulated so far.
    pub turn_count: usize,
}

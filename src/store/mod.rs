//! Document store boundary for screening outcomes.
//!
//! One record per candidate, keyed by the candidate identifier. The
//! production implementation is MongoDB; tests substitute an in-memory
//! store behind the same trait.

mod mongo;

pub use mongo::MongoScreenStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of one completed phone screen. The candidate identifier is the
/// idempotency key: writing the same outcome twice overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenOutcome {
    pub candidate_uid: String,
    pub score: i32,
    pub notes: String,
    pub completed: bool,
}

/// Store handle shared across sessions; must be safe for concurrent use
/// by multiple sessions' finalize steps.
#[async_trait]
pub trait ScreenStore: Send + Sync {
    async fn record(&self, outcome: &ScreenOutcome) -> Result<()>;
}

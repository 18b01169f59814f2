use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one call session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No stream id bound; only a `start` event is accepted.
    AwaitingStart,
    /// Media flows bidirectionally.
    Active,
    /// Transcript flush and scoring handoff in progress.
    Finalizing,
    /// Terminal; further events for this session are dropped.
    Closed,
}

impl LifecycleState {
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::AwaitingStart => "awaiting_start",
            LifecycleState::Active => "active",
            LifecycleState::Finalizing => "finalizing",
            LifecycleState::Closed => "closed",
        }
    }
}

const AWAITING_START: u8 = 0;
const ACTIVE: u8 = 1;
const FINALIZING: u8 = 2;
const CLOSED: u8 = 3;

/// Compare-and-swap state machine. The CAS transitions are what make
/// finalize-and-score run at most once per session: however many `stop`
/// events or transport closes race, only one caller wins the
/// ACTIVE→FINALIZING edge.
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(AWAITING_START),
        }
    }

    pub fn current(&self) -> LifecycleState {
        match self.state.load(Ordering::SeqCst) {
            AWAITING_START => LifecycleState::AwaitingStart,
            ACTIVE => LifecycleState::Active,
            FINALIZING => LifecycleState::Finalizing,
            _ => LifecycleState::Closed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ACTIVE
    }

    /// AWAITING_START → ACTIVE. False if the session already started.
    pub fn activate(&self) -> bool {
        self.state
            .compare_exchange(AWAITING_START, ACTIVE, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// ACTIVE → FINALIZING. Exactly one caller wins; the rest get false
    /// and must not flush or hand off.
    pub fn begin_finalize(&self) -> bool {
        self.state
            .compare_exchange(ACTIVE, FINALIZING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Terminal transition, valid from any state. A session that never
    /// started closes without ever finalizing.
    pub fn close(&self) {
        self.state.store(CLOSED, Ordering::SeqCst);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

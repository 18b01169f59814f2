use crate::candidate::CandidateProfile;
use crate::config::Config;
use crate::model::CompletionModel;
use crate::session::{SessionRegistry, TranscriptWriter};
use crate::store::ScreenStore;
use crate::telephony::Dialer;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Active call sessions (stream id → session).
    pub sessions: SessionRegistry,

    pub model: Arc<dyn CompletionModel>,
    pub store: Arc<dyn ScreenStore>,
    pub transcript_writer: Arc<TranscriptWriter>,
    pub candidate: Arc<CandidateProfile>,
    pub dialer: Arc<Dialer>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        model: Arc<dyn CompletionModel>,
        store: Arc<dyn ScreenStore>,
        candidate: Arc<CandidateProfile>,
        dialer: Arc<Dialer>,
    ) -> Self {
        let transcript_writer = Arc::new(TranscriptWriter::new(&config.transcripts.path));

        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            model,
            store,
            transcript_writer,
            candidate,
            dialer,
        }
    }
}

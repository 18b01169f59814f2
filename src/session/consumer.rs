use std::sync::Arc;
use tracing::{debug, warn};

use crate::dialogue::TurnEngine;
use crate::recognition::RecognitionMessage;

/// What one recognition message amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerOutcome {
    /// Finalized utterance; a dialogue turn ran.
    Turn,
    /// Partial hypothesis, ignored.
    Partial,
    /// Valid message with nothing for the session (metadata, empty final).
    Ignored,
    /// Undecodable message, logged and dropped.
    Malformed,
}

/// Reads recognition messages and turns finalized results into dialogue
/// turns, exactly one utterance per finalized result.
#[derive(Clone)]
pub struct RecognitionConsumer {
    engine: Arc<TurnEngine>,
}

impl RecognitionConsumer {
    pub fn new(engine: Arc<TurnEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle_message(&self, text: &str) -> ConsumerOutcome {
        let message = match RecognitionMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Malformed recognition message: {}", e);
                return ConsumerOutcome::Malformed;
            }
        };

        let results = match message {
            RecognitionMessage::Results(results) => results,
            _ => return ConsumerOutcome::Ignored,
        };

        if !results.is_finalized() {
            debug!("Ignoring partial recognition result");
            return ConsumerOutcome::Partial;
        }

        let Some(utterance) = results.utterance() else {
            return ConsumerOutcome::Ignored;
        };

        self.engine.caller_turn(&utterance).await;
        ConsumerOutcome::Turn
    }
}

//! Dialogue turn engine: caller utterance in, agent reply out.
//!
//! Every model failure is absorbed here. A failed turn is logged and
//! skipped; the session stays active and waits for the caller's next
//! utterance.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::InterviewConfig;
use crate::model::{prompt, CompletionModel};
use crate::session::{Lifecycle, ResponseEmitter, Role, TranscriptLog};

pub struct TurnEngine {
    model: Arc<dyn CompletionModel>,
    transcript: Arc<TranscriptLog>,
    emitter: Arc<ResponseEmitter>,
    lifecycle: Arc<Lifecycle>,
    interview: InterviewConfig,
}

impl TurnEngine {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        transcript: Arc<TranscriptLog>,
        emitter: Arc<ResponseEmitter>,
        lifecycle: Arc<Lifecycle>,
        interview: InterviewConfig,
    ) -> Self {
        Self {
            model,
            transcript,
            emitter,
            lifecycle,
            interview,
        }
    }

    /// Opening greeting, invoked once on session activation. Uses the
    /// fixed introductory instruction, not conversation history.
    pub async fn bootstrap(&self) {
        let instruction = prompt::bootstrap_instruction(&self.interview);

        match self.model.complete(&instruction).await {
            Ok(greeting) => {
                self.transcript.append(Role::Agent, greeting.clone()).await;
                self.emitter.send(&greeting).await;
                info!("Bootstrap greeting emitted");
            }
            Err(e) => {
                // The call proceeds without a greeting; the caller's first
                // utterance still starts a normal turn.
                warn!("Bootstrap greeting failed: {}", e);
            }
        }
    }

    /// One caller→agent turn cycle for a finalized utterance.
    pub async fn caller_turn(&self, utterance: &str) {
        info!("Caller said: {}", utterance);

        let history = self.transcript.snapshot().await;
        self.transcript.append(Role::Caller, utterance).await;

        let turn_prompt = prompt::turn_prompt(&self.interview, &history, utterance);

        let reply = match self.model.complete(&turn_prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model turn failed, skipping: {}", e);
                return;
            }
        };

        // A completion that lands after stop is discarded; the transcript
        // was already flushed.
        if !self.lifecycle.is_active() {
            info!("Session no longer active; discarding in-flight reply");
            return;
        }

        self.transcript.append(Role::Agent, reply.clone()).await;
        self.emitter.send(&reply).await;
        info!("Agent replied: {}", reply);
    }
}

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use callscreen::config::InterviewConfig;
use callscreen::recognition::RecognitionSink;
use callscreen::session::{CallSession, SessionDeps, TranscriptWriter};
use callscreen::store::{ScreenOutcome, ScreenStore};
use callscreen::CompletionModel;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Completion model double replaying a script. `None` entries fail the
/// call, exercising the skip-the-turn paths.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedModel {
    pub fn new<I>(script: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Option<&'static str>>,
    {
        Arc::new(Self {
            replies: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
        })
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        match self.replies.lock().await.pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(anyhow!("model unavailable")),
            None => Err(anyhow!("model script exhausted")),
        }
    }
}

/// Recognition sink double recording forwarded audio.
#[derive(Default)]
pub struct RecordingSink {
    pub frames: Mutex<Vec<Vec<u8>>>,
    pub closed: Mutex<bool>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl RecognitionSink for RecordingSink {
    async fn send_audio(&self, audio: Vec<u8>) -> Result<()> {
        self.frames.lock().await.push(audio);
        Ok(())
    }

    async fn keepalive(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *self.closed.lock().await = true;
        Ok(())
    }
}

/// In-memory screening store recording every write.
#[derive(Default)]
pub struct MemoryStore {
    pub writes: Mutex<Vec<ScreenOutcome>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ScreenStore for MemoryStore {
    async fn record(&self, outcome: &ScreenOutcome) -> Result<()> {
        self.writes.lock().await.push(outcome.clone());
        Ok(())
    }
}

pub fn interview_config() -> InterviewConfig {
    InterviewConfig {
        agent_name: "Carla".to_string(),
        company: "Coca-Cola".to_string(),
        job_role: "Backend Engineer".to_string(),
        resume_summary: "Five years of services work".to_string(),
    }
}

/// Session wired to doubles, flushing transcripts under `dir`.
pub fn build_session(
    model: Arc<ScriptedModel>,
    store: Arc<MemoryStore>,
    sink: Arc<RecordingSink>,
    dir: &Path,
) -> Arc<CallSession> {
    Arc::new(CallSession::new(SessionDeps {
        sink,
        model,
        store,
        writer: Arc::new(TranscriptWriter::new(dir)),
        interview: interview_config(),
        candidate_uid: "cand-42".to_string(),
    }))
}

/// Decode a telephony wire frame, panicking on malformed input. Tests
/// that exercise the malformed path call `TelephonyEvent::parse` directly.
pub fn event(text: &str) -> callscreen::TelephonyEvent {
    callscreen::TelephonyEvent::parse(text).unwrap()
}

pub fn start_event(sid: &str) -> String {
    format!(r#"{{"event":"start","start":{{"streamSid":"{sid}"}}}}"#)
}

pub fn media_event(payload: &str) -> String {
    format!(r#"{{"event":"media","media":{{"payload":"{payload}"}}}}"#)
}

pub fn stop_event() -> String {
    r#"{"event":"stop"}"#.to_string()
}

pub fn finalized_result(words: &[&str]) -> String {
    let words: Vec<String> = words
        .iter()
        .map(|w| format!(r#"{{"word":"{w}"}}"#))
        .collect();

    format!(
        r#"{{"type":"Results","is_final":true,"channel":{{"alternatives":[{{"transcript":"","words":[{}]}}]}}}}"#,
        words.join(",")
    )
}

pub fn partial_result(words: &[&str]) -> String {
    finalized_result(words).replace("\"is_final\":true", "\"is_final\":false")
}

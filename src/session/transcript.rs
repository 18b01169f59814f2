use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Speaker of one transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Caller,
    Agent,
}

/// One utterance in conversational order. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Role,
    pub text: String,
    /// Sequence position; assigned under the log's lock at append time.
    pub position: usize,
}

/// Append-only ordered log of one session's turns.
///
/// Session-scoped by construction: each `CallSession` owns its log, so
/// concurrent calls cannot cross-contaminate. Only the dialogue engine
/// and the bootstrap path append, which gives the single-writer
/// discipline the ordering invariant needs.
pub struct TranscriptLog {
    turns: Mutex<Vec<TranscriptTurn>>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
        }
    }

    /// Append one turn and return its sequence position.
    pub async fn append(&self, role: Role, text: impl Into<String>) -> usize {
        let mut turns = self.turns.lock().await;
        let position = turns.len();
        turns.push(TranscriptTurn {
            role,
            text: text.into(),
            position,
        });
        position
    }

    pub async fn len(&self) -> usize {
        self.turns.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.lock().await.is_empty()
    }

    /// Ordered copy of the log, for prompts, queries, and the flush.
    pub async fn snapshot(&self) -> Vec<TranscriptTurn> {
        self.turns.lock().await.clone()
    }
}

impl Default for TranscriptLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Durable `{role, text}` record, the shape the scoring handoff consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurableTurn {
    pub role: Role,
    pub text: String,
}

/// Writes one JSON transcript document per session into a directory.
pub struct TranscriptWriter {
    dir: PathBuf,
}

impl TranscriptWriter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Flush the finished transcript. Called exactly once per session,
    /// from the finalize path.
    pub fn flush(&self, stream_sid: &str, turns: &[TranscriptTurn]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create transcript directory {:?}", self.dir))?;

        let records: Vec<DurableTurn> = turns
            .iter()
            .map(|t| DurableTurn {
                role: t.role,
                text: t.text.clone(),
            })
            .collect();

        let path = self.dir.join(format!("{}.json", stream_sid));
        let json = serde_json::to_string_pretty(&records)
            .context("Failed to serialize transcript")?;

        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write transcript {:?}", path))?;

        Ok(path)
    }
}

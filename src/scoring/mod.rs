//! Post-call scoring handoff.
//!
//! Grades the durable transcript with the generative model and writes the
//! candidate's screening record. Invoked exactly once per session from
//! the finalize path; failure here is logged by the caller and never
//! reopens the session.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::{prompt, CompletionModel};
use crate::session::{DurableTurn, TranscriptTurn};
use crate::store::{ScreenOutcome, ScreenStore};

/// Fallback applied when the grading model fails or returns no parseable
/// score. The notes still carry whatever the model (or the error) said.
pub const DEFAULT_SCREEN_SCORE: i32 = 8;

/// First integer in `1..=10` found in the grading completion.
pub fn extract_score(text: &str) -> Option<i32> {
    let mut digits = String::new();

    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        if !digits.is_empty() {
            if let Ok(n) = digits.parse::<i32>() {
                if (1..=10).contains(&n) {
                    return Some(n);
                }
            }
            digits.clear();
        }
    }

    None
}

/// Grade the completed transcript and record the outcome for the
/// candidate. The candidate identifier is the idempotent key; the
/// lifecycle guard upstream ensures this runs at most once per session.
pub async fn review_and_record(
    model: &dyn CompletionModel,
    store: &dyn ScreenStore,
    candidate_uid: &str,
    turns: &[TranscriptTurn],
) -> Result<()> {
    let records: Vec<DurableTurn> = turns
        .iter()
        .map(|t| DurableTurn {
            role: t.role,
            text: t.text.clone(),
        })
        .collect();

    let transcript =
        serde_json::to_string(&records).context("Failed to serialize transcript for grading")?;

    let (score, notes) = match model.complete(&prompt::grading_prompt(&transcript)).await {
        Ok(content) => {
            let score = extract_score(&content).unwrap_or_else(|| {
                warn!("No parseable score in grading completion; using default");
                DEFAULT_SCREEN_SCORE
            });
            (score, content)
        }
        Err(e) => {
            warn!("Grading model failed; using default score: {}", e);
            (DEFAULT_SCREEN_SCORE, format!("Grading unavailable: {}", e))
        }
    };

    let outcome = ScreenOutcome {
        candidate_uid: candidate_uid.to_string(),
        score,
        notes,
        completed: true,
    };

    store
        .record(&outcome)
        .await
        .context("Failed to record screening outcome")?;

    info!("Screening scored for candidate {}", candidate_uid);

    Ok(())
}

use anyhow::{Context, Result};
use serde::Deserialize;

/// Inbound message on the recognition channel, discriminated by `type`.
///
/// Only `Results` drives the session; the other variants are protocol
/// chatter that keeps the channel warm. Unknown discriminators fail
/// deserialization and are dropped by the consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RecognitionMessage {
    Results(ResultsPayload),
    Metadata,
    SpeechStarted,
    UtteranceEnd,
}

impl RecognitionMessage {
    /// Decode one text frame from the recognition socket.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Unrecognized recognition message")
    }
}

/// A transcription fragment, partial or finalized.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsPayload {
    pub channel: RecognitionChannel,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionChannel {
    pub alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<RecognizedWord>,
}

/// One recognized word token.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedWord {
    pub word: String,
}

impl ResultsPayload {
    /// Finalized fragments produce transcript turns; partials are interim
    /// hypotheses still subject to revision.
    pub fn is_finalized(&self) -> bool {
        self.is_final
    }

    /// Join the top alternative's word tokens into one utterance,
    /// preserving token order with single-space separation. `None` when
    /// the result carries no words (silence finalization).
    pub fn utterance(&self) -> Option<String> {
        let alt = self.channel.alternatives.first()?;
        if alt.words.is_empty() {
            return None;
        }

        Some(
            alt.words
                .iter()
                .map(|w| w.word.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

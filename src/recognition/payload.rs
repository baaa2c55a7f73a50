//! Recognition results and their wire payload

use serde::{Deserialize, Serialize};

use crate::recognition::{ErrorCode, RecognitionError};

/// Result of one listening attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecognitionResult {
    /// Best transcript
    pub transcript: String,
    /// Engine hypotheses, best first
    pub alternates: Vec<String>,
    /// Confidence of the best transcript
    pub confidence: Option<f32>,
    /// Confidence per alternate
    pub alternate_confidences: Option<Vec<f32>>,
}

/// Result payload as sent by engine bridges
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    all_results: Option<Vec<String>>,
    #[serde(default)]
    all_confidences: Option<Vec<f32>>,
}

impl RecognitionResult {
    /// A single transcript without alternates
    #[must_use]
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON result payload
    ///
    /// # Errors
    ///
    /// Returns a `MALFORMED_PAYLOAD` error if the payload is not a result object
    pub fn from_payload(raw: &str) -> Result<Self, RecognitionError> {
        let wire: WirePayload = serde_json::from_str(raw).map_err(|e| {
            tracing::warn!(error = %e, "unparseable recognition payload");
            RecognitionError::malformed(e.to_string())
        })?;

        Ok(Self {
            transcript: wire.text.unwrap_or_default(),
            alternates: wire.all_results.unwrap_or_default(),
            confidence: wire.confidence,
            alternate_confidences: wire.all_confidences,
        })
    }

    /// Build a result from an engine's match list
    ///
    /// The best transcript is the first match, or the most confident one when
    /// every match carries a confidence.
    ///
    /// # Errors
    ///
    /// Returns `NO_MATCH` if there are no matches
    pub fn from_alternatives(
        matches: Vec<String>,
        confidences: Option<Vec<f32>>,
    ) -> Result<Self, RecognitionError> {
        if matches.is_empty() {
            return Err(RecognitionError::new(
                ErrorCode::NoMatch,
                "no recognition result",
            ));
        }

        let mut best = 0;
        let mut confidence = None;

        if let Some(confs) = confidences.as_deref().filter(|c| c.len() == matches.len()) {
            let mut best_score = confs[0];
            for (i, &c) in confs.iter().enumerate().skip(1) {
                if c > best_score {
                    best_score = c;
                    best = i;
                }
            }
            confidence = Some(best_score);
        }

        Ok(Self {
            transcript: matches[best].clone(),
            alternates: matches,
            confidence,
            alternate_confidences: confidences,
        })
    }

    /// Phrases to resolve: the alternates, or the transcript alone when there are none
    #[must_use]
    pub fn candidates(&self) -> Vec<&str> {
        if !self.alternates.is_empty() {
            return self.alternates.iter().map(String::as_str).collect();
        }
        if self.transcript.is_empty() {
            return Vec::new();
        }
        vec![self.transcript.as_str()]
    }
}

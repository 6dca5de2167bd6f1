use std::sync::Arc;

use crate::{ai::FallbackClassifier, domain::SpamVerdict};

use super::{heuristics, ClassifyError};

const SPAM_LABEL: &str = "spam";
const LEGITIMATE_LABEL: &str = "legitimate";
const CLEAN_CONFIDENCE: f32 = 0.8;

#[derive(Clone)]
pub struct SpamEngine {
    fallback: Option<Arc<dyn FallbackClassifier>>,
    max_model_chars: usize,
}

impl SpamEngine {
    pub fn new(fallback: Option<Arc<dyn FallbackClassifier>>, max_model_chars: usize) -> Self {
        Self {
            fallback,
            max_model_chars,
        }
    }

    pub async fn detect(&self, subject: &str, body: &str) -> SpamVerdict {
        match self.try_detect(subject, body).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(target: "classifier", error = %err, "spam detection failed");
                SpamVerdict::failed(err)
            }
        }
    }

    async fn try_detect(&self, subject: &str, body: &str) -> Result<SpamVerdict, ClassifyError> {
        let text = format!("{subject} {body}");

        if let Some(verdict) = heuristics::score(&text) {
            return Ok(verdict);
        }

        let Some(fallback) = &self.fallback else {
            return Ok(SpamVerdict::legitimate(
                CLEAN_CONFIDENCE,
                "no spam indicators found",
            ));
        };

        let truncated = truncate_chars(&text, self.max_model_chars);
        let classification = fallback
            .classify(truncated, &[SPAM_LABEL, LEGITIMATE_LABEL])
            .await?;

        Ok(if classification.label.eq_ignore_ascii_case(SPAM_LABEL) {
            SpamVerdict::spam(classification.score, "model detection")
        } else {
            SpamVerdict::legitimate(classification.score, "legitimate email")
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

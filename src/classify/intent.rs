use std::sync::Arc;

use crate::{
    ai::FallbackClassifier,
    domain::{Intent, IntentVerdict},
};

use super::{entities, patterns, ClassifyError};

const PATTERN_CONFIDENCE: f32 = 0.95;

#[derive(Clone)]
pub struct IntentEngine {
    fallback: Option<Arc<dyn FallbackClassifier>>,
}

impl IntentEngine {
    pub fn new(fallback: Option<Arc<dyn FallbackClassifier>>) -> Self {
        Self { fallback }
    }

    pub async fn classify(&self, text: &str) -> IntentVerdict {
        match self.try_classify(text).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(
                    target: "classifier",
                    error = %err,
                    "intent classification degraded to unknown"
                );
                IntentVerdict::unknown()
            }
        }
    }

    async fn try_classify(&self, text: &str) -> Result<IntentVerdict, ClassifyError> {
        let normalized = text.trim();

        if let Some(intent) = patterns::first_match(normalized, patterns::INTENT_TRIGGERS) {
            return Ok(IntentVerdict {
                intent,
                confidence: PATTERN_CONFIDENCE,
                entities: entities::extract(text, intent),
            });
        }

        let Some(fallback) = &self.fallback else {
            return Ok(IntentVerdict::unknown());
        };

        let candidates: Vec<&str> = Intent::KNOWN.iter().map(Intent::label).collect();
        let classification = fallback.classify(normalized, &candidates).await?;
        let intent = Intent::from_label(&classification.label)
            .ok_or(ClassifyError::UnmappedLabel(classification.label))?;

        Ok(IntentVerdict {
            intent,
            confidence: classification.score,
            entities: entities::extract(text, intent),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        ai::fallback::{Classification, ClassifierError},
        domain::Entities,
    };

    struct FixedModel(&'static str, f32);

    #[async_trait]
    impl FallbackClassifier for FixedModel {
        async fn classify(
            &self,
            _text: &str,
            candidates: &[&str],
        ) -> Result<Classification, ClassifierError> {
            assert_eq!(candidates.len(), Intent::KNOWN.len());
            Ok(Classification {
                label: self.0.to_string(),
                score: self.1,
            })
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl FallbackClassifier for BrokenModel {
        async fn classify(
            &self,
            _text: &str,
            _candidates: &[&str],
        ) -> Result<Classification, ClassifierError> {
            Err(ClassifierError::Malformed("boom".into()))
        }
    }

    #[tokio::test]
    async fn trigger_phrase_wins_with_fixed_confidence() {
        let engine = IntentEngine::new(Some(Arc::new(FixedModel("search", 0.4))));
        let verdict = engine.classify("  Please compose a note to ann@mail.com ").await;
        assert_eq!(verdict.intent, Intent::ComposeEmail);
        assert_eq!(verdict.confidence, 0.95);
        assert_eq!(verdict.entities.email.as_deref(), Some("ann@mail.com"));
    }

    #[tokio::test]
    async fn search_query_keeps_original_casing() {
        let engine = IntentEngine::new(None);
        let verdict = engine.classify("Find emails from Alice").await;
        assert_eq!(verdict.intent, Intent::Search);
        assert_eq!(verdict.entities.query.as_deref(), Some("emails from Alice"));
    }

    #[tokio::test]
    async fn no_match_without_fallback_is_unknown() {
        let engine = IntentEngine::new(None);
        let verdict = engine.classify("what is the weather like").await;
        assert_eq!(verdict, IntentVerdict::unknown());
        assert_eq!(verdict.entities, Entities::default());
    }

    #[tokio::test]
    async fn fallback_label_and_score_pass_through() {
        let engine = IntentEngine::new(Some(Arc::new(FixedModel("next_email", 0.61))));
        let verdict = engine.classify("skip to message 4").await;
        assert_eq!(verdict.intent, Intent::NextEmail);
        assert_eq!(verdict.confidence, 0.61);
        assert_eq!(verdict.entities.number, Some(4));
    }

    #[tokio::test]
    async fn failing_fallback_degrades_to_unknown() {
        let engine = IntentEngine::new(Some(Arc::new(BrokenModel)));
        assert_eq!(engine.classify("hmm").await, IntentVerdict::unknown());
    }

    #[tokio::test]
    async fn unmapped_fallback_label_degrades_to_unknown() {
        let engine = IntentEngine::new(Some(Arc::new(FixedModel("archive", 0.9))));
        assert_eq!(engine.classify("hmm").await, IntentVerdict::unknown());
    }

    #[tokio::test]
    async fn identical_input_gives_identical_verdicts() {
        let engine = IntentEngine::new(None);
        let first = engine.classify("delete email 3").await;
        let second = engine.classify("delete email 3").await;
        assert_eq!(first, second);
    }
}

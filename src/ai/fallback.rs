use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier returned malformed output: {0}")]
    Malformed(String),
    #[error("classifier chose {0:?}, which is not a candidate label")]
    UnknownLabel(String),
    #[error("classifier returned a non-finite score")]
    InvalidScore,
}

#[async_trait]
pub trait FallbackClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidates: &[&str],
    ) -> Result<Classification, ClassifierError>;
}

pub fn normalize(
    raw_label: &str,
    raw_score: f64,
    candidates: &[&str],
) -> Result<Classification, ClassifierError> {
    let wanted = raw_label.trim();
    let label = candidates
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ClassifierError::UnknownLabel(raw_label.to_string()))?;
    if !raw_score.is_finite() {
        return Err(ClassifierError::InvalidScore);
    }
    Ok(Classification {
        label: (*label).to_string(),
        score: raw_score.clamp(0.0, 1.0) as f32,
    })
}

use serde::Serialize;

use super::intent::Intent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.query.is_none() && self.number.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentVerdict {
    pub intent: Intent,
    pub confidence: f32,
    pub entities: Entities,
}

impl IntentVerdict {
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            entities: Entities::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpamVerdict {
    pub is_spam: bool,
    pub confidence: f32,
    pub reason: String,
}

impl SpamVerdict {
    pub fn spam(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(true, confidence, reason)
    }

    pub fn legitimate(confidence: f32, reason: impl Into<String>) -> Self {
        Self::new(false, confidence, reason)
    }

    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self::new(false, 0.0, format!("detection failed: {cause}"))
    }

    fn new(is_spam: bool, confidence: f32, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            "no reason given".to_string()
        } else {
            reason
        };
        Self {
            is_spam,
            confidence: confidence.clamp(0.0, 1.0),
            reason,
        }
    }
}

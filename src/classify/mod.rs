pub mod entities;
pub mod heuristics;
mod intent;
pub mod patterns;
mod spam;

use thiserror::Error;

use crate::ai::ClassifierError;

pub use intent::IntentEngine;
pub use spam::SpamEngine;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Fallback(#[from] ClassifierError),
    #[error("fallback label {0:?} does not map to a known intent")]
    UnmappedLabel(String),
}

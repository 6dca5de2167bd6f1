pub mod client;
pub mod fallback;
mod inference;
pub mod speech;

pub use client::ChatClassifier;
pub use fallback::{ClassifierError, FallbackClassifier};
pub use speech::{CachedSynthesizer, SpeechClient, SpeechError, Synthesizer, Transcriber};

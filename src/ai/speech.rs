use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SpeechConfig;

const CACHE_KEY_CHARS: usize = 100;
const CACHEABLE_TEXT_CHARS: usize = 200;
const MAX_CACHED_PHRASES: usize = 256;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("speech service url is invalid: {0}")]
    Url(#[from] url::ParseError),
    #[error("speech service returned no audio")]
    EmptyAudio,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, language: &str) -> Result<String, SpeechError>;
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Arc<[u8]>, SpeechError>;
}

#[derive(Clone)]
pub struct SpeechClient {
    http: Client,
    api_key: String,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn from_config(http: Client, config: &SpeechConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            http,
            api_key,
            config: config.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl Transcriber for SpeechClient {
    async fn transcribe(&self, audio: Vec<u8>, language: &str) -> Result<String, SpeechError> {
        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("language", language.to_string())
            .part("file", Part::bytes(audio).file_name("audio.wav"));

        let response: TranscriptionResponse = self
            .http
            .post(self.config.base_url.join("audio/transcriptions")?)
            .bearer_auth(&self.api_key)
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.text.trim().to_string())
    }
}

#[async_trait]
impl Synthesizer for SpeechClient {
    async fn synthesize(&self, text: &str, _language: &str) -> Result<Arc<[u8]>, SpeechError> {
        let request = SpeechRequest {
            model: &self.config.synthesis_model,
            input: text,
            voice: &self.config.voice,
            response_format: "mp3",
        };
        let bytes = self
            .http
            .post(self.config.base_url.join("audio/speech")?)
            .bearer_auth(&self.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(Arc::from(bytes.as_ref()))
    }
}

/// Memoizes short phrases ("Inbox is empty", "Message deleted") that get spoken repeatedly.
pub struct CachedSynthesizer<S> {
    inner: S,
    capacity: usize,
    cache: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl<S: Synthesizer> CachedSynthesizer<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, MAX_CACHED_PHRASES)
    }

    fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

fn cache_key(text: &str, language: &str) -> String {
    let prefix: String = text.chars().take(CACHE_KEY_CHARS).collect();
    format!("{language}:{prefix}")
}

#[async_trait]
impl<S: Synthesizer> Synthesizer for CachedSynthesizer<S> {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Arc<[u8]>, SpeechError> {
        let key = cache_key(text, language);
        let hit = self.cache.lock().get(&key).cloned();
        if let Some(hit) = hit {
            tracing::debug!(target: "speech", "synthesis cache hit");
            return Ok(hit);
        }

        let audio = self.inner.synthesize(text, language).await?;
        if text.chars().count() < CACHEABLE_TEXT_CHARS {
            let mut cache = self.cache.lock();
            // full cache keeps its current phrases; new ones are served uncached
            if cache.len() < self.capacity {
                cache.insert(key, audio.clone());
                tracing::debug!(target: "speech", entries = cache.len(), "synthesis cached");
            }
        }
        Ok(audio)
    }
}

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{IntentVerdict, SpamVerdict};

use super::{error::ApiError, state::ApiState};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
pub struct VoiceCommandRequest {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpamDetectionRequest {
    subject: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechToTextRequest {
    audio: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextToSpeechRequest {
    text: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    text: String,
    confidence: f32,
}

pub async fn health(State(state): State<Arc<ApiState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at,
        "tracked_clients": state.admission.tracked_clients(),
    }))
}

pub async fn voice_command(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<VoiceCommandRequest>, JsonRejection>,
) -> Result<Json<IntentVerdict>, ApiError> {
    let Json(request) = payload?;
    let text = request
        .text
        .ok_or_else(|| ApiError::validation("missing text data"))?;

    let verdict = state.intents.classify(&text).await;
    tracing::info!(
        target: "classifier",
        intent = %verdict.intent,
        confidence = verdict.confidence,
        has_entities = !verdict.entities.is_empty(),
        "voice command classified"
    );
    Ok(Json(verdict))
}

pub async fn spam_detection(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SpamDetectionRequest>, JsonRejection>,
) -> Result<Json<SpamVerdict>, ApiError> {
    let Json(request) = payload?;
    let (Some(subject), Some(body)) = (request.subject, request.body) else {
        return Err(ApiError::validation("missing subject or body"));
    };

    let verdict = state.spam.detect(&subject, &body).await;
    tracing::info!(
        target: "classifier",
        is_spam = verdict.is_spam,
        confidence = verdict.confidence,
        reason = %verdict.reason,
        "spam check finished"
    );
    Ok(Json(verdict))
}

pub async fn speech_to_text(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SpeechToTextRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Json(request) = payload?;
    let audio = request
        .audio
        .ok_or_else(|| ApiError::validation("missing audio data"))?;
    let transcriber = state
        .transcriber
        .clone()
        .ok_or(ApiError::Unavailable("speech-to-text"))?;

    let bytes = decode_audio(&audio)?;
    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let text = transcriber
        .transcribe(bytes, language)
        .await
        .map_err(|source| ApiError::Upstream {
            context: "speech recognition failed",
            source,
        })?;

    // the transcription model reports no per-utterance confidence
    Ok(Json(TranscriptResponse {
        text,
        confidence: 1.0,
    }))
}

pub async fn text_to_speech(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TextToSpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let text = request
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::validation("missing text data"))?;
    let synthesizer = state
        .synthesizer
        .clone()
        .ok_or(ApiError::Unavailable("text-to-speech"))?;

    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let audio = synthesizer
        .synthesize(&text, language)
        .await
        .map_err(|source| ApiError::Upstream {
            context: "speech synthesis failed",
            source,
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"speech.mp3\""),
        ],
        Body::from(Bytes::copy_from_slice(&audio)),
    )
        .into_response())
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Accepts bare base64 or a `data:audio/...;base64,` URL.
fn decode_audio(raw: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = match raw.trim() {
        data if data.starts_with("data:") => data
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| ApiError::validation("malformed audio data url"))?,
        plain => plain,
    };
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| ApiError::validation(format!("audio is not valid base64: {err}")))?;
    if bytes.is_empty() {
        return Err(ApiError::validation("audio data is empty"));
    }
    Ok(bytes)
}

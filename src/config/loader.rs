use std::{env, str::FromStr, time::Duration};

use url::Url;

use super::env::{
    AdmissionConfig, AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, LogRotation,
    LoggingConfig, ServerConfig, SpeechConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let server = ServerConfig {
            bind_host: env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000)?,
            cors_origins: env::var("CORS_ORIGIN")
                .map(|value| {
                    value
                        .split(',')
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_bytes: parse_or("MAX_BODY_BYTES", 10 * 1024 * 1024)?,
        };

        let window_secs = non_zero(
            parse_or("RATE_LIMIT_WINDOW_SECS", 60u64)?,
            "RATE_LIMIT_WINDOW_SECS",
        )?;
        let admission = AdmissionConfig {
            window: Duration::from_secs(window_secs),
            max_requests: non_zero(
                parse_or("RATE_LIMIT_PER_MINUTE", 60u32)?,
                "RATE_LIMIT_PER_MINUTE",
            )?,
        };

        let ai_timeout = Duration::from_millis(parse_or("AI_TIMEOUT_MS", 10_000u64)?);

        let classifier = ClassifierConfig {
            api_key: non_empty("AI_API_KEY"),
            base_url: parse_url("AI_BASE_URL", "https://api.cerebras.ai/v1")?,
            model: env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| "gpt-oss-120b".to_string()),
            timeout: ai_timeout,
            spam_max_chars: parse_or("SPAM_MODEL_MAX_CHARS", 500)?,
        };

        let speech = SpeechConfig {
            api_key: non_empty("SPEECH_API_KEY"),
            base_url: parse_url("SPEECH_BASE_URL", "https://api.openai.com/v1")?,
            transcription_model: env::var("WHISPER_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            synthesis_model: env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            voice: env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
            timeout: ai_timeout,
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            file_name: non_empty("LOG_FILE").unwrap_or_else(|| "voicemail-ai.log".to_string()),
            rotation: parse_or("LOG_ROTATION", LogRotation::Daily)?,
        };

        Ok(Self {
            server,
            admission,
            classifier,
            speech,
            directories,
            logging,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}

fn non_zero<T: PartialEq + From<u8>>(value: T, key: &'static str) -> Result<T, ConfigError> {
    if value == T::from(0) {
        Err(ConfigError::Zero { key })
    } else {
        Ok(value)
    }
}

// Base URLs are joined with relative paths later, so they always end in `/`.
fn parse_url(key: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|source| ConfigError::Url { key, source })
}

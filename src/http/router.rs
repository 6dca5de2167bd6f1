use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::{handlers, middleware::admission_gate, state::ApiState};

pub fn build_router(state: Arc<ApiState>, server: &ServerConfig) -> Router {
    let governed = Router::new()
        .route("/api/voice-command", post(handlers::voice_command))
        .route("/api/spam-detection", post(handlers::spam_detection))
        .route("/api/speech-to-text", post(handlers::speech_to_text))
        .route("/api/text-to-speech", post(handlers::text_to_speech))
        .route_layer(axum_mw::from_fn_with_state(state.clone(), admission_gate));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(governed)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    target: "http",
                    origin = %origin,
                    error = %err,
                    "ignoring invalid CORS origin"
                );
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

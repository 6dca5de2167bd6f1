use std::{net::SocketAddr, sync::Arc, time::Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::admission::{Decision, ANONYMOUS_CLIENT};

use super::{error::ApiError, state::ApiState};

pub async fn admission_gate(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client_key = client_key(&request);
    match state.admission.admit(&client_key, Instant::now()) {
        Decision::Admitted { remaining } => {
            tracing::trace!(target: "admission", client = %client_key, remaining, "admitted");
            Ok(next.run(request).await)
        }
        Decision::Rejected { retry_after } => {
            tracing::warn!(
                target: "admission",
                client = %client_key,
                path = %request.uri().path(),
                retry_after_ms = retry_after.as_millis() as u64,
                "rate limit exceeded"
            );
            Err(ApiError::RateLimited { retry_after })
        }
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}

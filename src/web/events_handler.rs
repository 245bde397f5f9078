use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::server::AppState;
use crate::core::events::{classify, ChallengeResponse, EventError, InboundEvent};
use crate::core::moderation::DispatchError;
use crate::infra::slack::SignatureError;

/// Everything that can turn a delivery into an error response.
/// None of these ever take the process down.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Failed validation: {0}")]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::Signature(_) => {
                tracing::warn!("Rejected webhook delivery: {}", self);
                StatusCode::UNAUTHORIZED
            }
            WebError::Event(_) | WebError::Dispatch(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Events API endpoint.
///
/// Message moderation runs on its own task after the 200 has been produced,
/// so slow or failing Slack calls never delay or change the acknowledgment.
pub async fn handle_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebError> {
    state.verifier.verify(&headers, &body)?;

    match classify(&body)? {
        InboundEvent::HandshakeChallenge { token } => {
            tracing::info!("Answering url_verification handshake");
            Ok(Json(ChallengeResponse { challenge: token }).into_response())
        }
        InboundEvent::ChannelCreated(channel) => {
            state.moderation.join_channel(&channel).await?;
            Ok(StatusCode::OK.into_response())
        }
        InboundEvent::Message(message) => {
            if message.is_bot() {
                tracing::debug!(bot_id = %message.bot_id, "Skipping bot message");
                return Ok(StatusCode::OK.into_response());
            }

            let moderation = Arc::clone(&state.moderation);
            tokio::spawn(async move {
                let report = moderation.moderate(&message).await;
                if report.failed > 0 {
                    tracing::warn!(
                        matched = report.matched,
                        failed = report.failed,
                        "Some moderation actions could not be sent"
                    );
                }
            });
            Ok(StatusCode::OK.into_response())
        }
        InboundEvent::Other => Ok(StatusCode::OK.into_response()),
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

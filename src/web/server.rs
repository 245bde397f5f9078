use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::events_handler::{handle_events, healthz};
use crate::core::moderation::{ModerationService, SlackApi};
use crate::infra::slack::SignatureVerifier;

/// Shared state handed to every request.
///
/// Both members are read-only after startup, so cloning the `Arc`s is all
/// a concurrent delivery needs.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<SignatureVerifier>,
    pub moderation: Arc<ModerationService<Box<dyn SlackApi>>>,
}

impl AppState {
    pub fn new(
        verifier: SignatureVerifier,
        moderation: ModerationService<Box<dyn SlackApi>>,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            moderation: Arc::new(moderation),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_events))
        .route("/slack/events", post(handle_events))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

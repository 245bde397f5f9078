// Moderation service - core business logic for word filtering.
//
// This service handles:
// - Matching message text against the configured trigger words
// - Dispatching the resulting actions through the Slack API port
// - Joining newly created channels so their messages reach us
//
// NO HTTP dependencies here - just pure domain logic plus the port trait.

use super::moderation_models::{
    FilterMatch, FilterSet, ModerationAction, ModerationOutcome, ModerationReport,
};
use crate::core::events::{ChannelCreated, MessageEvent};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Errors surfaced by a Slack Web API implementation.
#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Slack returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Slack answered `"ok": false`.
    #[error("Slack API error: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to call {method}: {source}")]
    Method {
        method: String,
        #[source]
        source: SlackApiError,
    },

    #[error("Failed to join channel {channel}: {source}")]
    Join {
        channel: String,
        #[source]
        source: SlackApiError,
    },
}

// ============================================================================
// SLACK API TRAIT (PORT)
// ============================================================================

/// Outbound calls the core needs from the Slack Web API.
///
/// Implementations are shared between concurrent deliveries, so they must be
/// safe to call from several tasks at once.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Invoke `method` with the moderation parameters as its body.
    async fn call_method(
        &self,
        method: &str,
        params: &ModerationAction,
    ) -> Result<(), SlackApiError>;

    /// `conversations.join` for the given channel.
    async fn join_channel(&self, channel_id: &str) -> Result<(), SlackApiError>;
}

// Lets the web layer hold a `ModerationService<Box<dyn SlackApi>>` and swap
// in mocks without generics leaking into the router.
#[async_trait]
impl SlackApi for Box<dyn SlackApi> {
    async fn call_method(
        &self,
        method: &str,
        params: &ModerationAction,
    ) -> Result<(), SlackApiError> {
        (**self).call_method(method, params).await
    }

    async fn join_channel(&self, channel_id: &str) -> Result<(), SlackApiError> {
        (**self).join_channel(channel_id).await
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Evaluate a message against the filters.
///
/// Every (filter, trigger) pair that matches yields its own action, so a
/// filter with two matching words fires twice. Bot messages never match.
pub fn evaluate<'a>(event: &MessageEvent, filters: &'a FilterSet) -> ModerationOutcome<'a> {
    let mut outcome = ModerationOutcome::default();

    if event.is_bot() {
        return outcome;
    }

    for filter in filters.iter() {
        for trigger in &filter.triggers {
            if event.text.contains(trigger.as_str()) {
                outcome.any_matched = true;
                outcome.matches.push(FilterMatch {
                    filter,
                    trigger: trigger.as_str(),
                    action: ModerationAction::for_message(event, filter),
                });
            }
        }
    }

    outcome
}

/// Send one moderation action. Single attempt, no retry.
pub async fn dispatch<A: SlackApi + ?Sized>(
    action: &ModerationAction,
    method: &str,
    api: &A,
) -> Result<(), DispatchError> {
    api.call_method(method, action)
        .await
        .map_err(|source| DispatchError::Method {
            method: method.to_string(),
            source,
        })
}

/// Join a freshly created channel.
pub async fn on_channel_created<A: SlackApi + ?Sized>(
    channel: &ChannelCreated,
    api: &A,
) -> Result<(), DispatchError> {
    api.join_channel(&channel.channel_id)
        .await
        .map_err(|source| DispatchError::Join {
            channel: channel.channel_id.clone(),
            source,
        })
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Filters plus the API client used to act on them.
pub struct ModerationService<A: SlackApi> {
    filters: FilterSet,
    api: A,
}

impl<A: SlackApi> ModerationService<A> {
    pub fn new(filters: FilterSet, api: A) -> Self {
        Self { filters, api }
    }

    /// Evaluate and dispatch. Dispatch failures are logged and skipped so
    /// one broken filter never blocks the ones after it.
    pub async fn moderate(&self, event: &MessageEvent) -> ModerationReport {
        let outcome = evaluate(event, &self.filters);
        let mut report = ModerationReport {
            matched: outcome.matches.len(),
            ..Default::default()
        };

        if !outcome.any_matched {
            return report;
        }

        let triggers: Vec<&str> = outcome.matches.iter().map(|m| m.trigger).collect();
        tracing::info!(
            channel = %event.channel,
            user = %event.user,
            ?triggers,
            "[MATCH] Filter words found in message, logging full event"
        );
        tracing::info!(event = ?event, "[EVENT]");

        for hit in &outcome.matches {
            let method = hit.filter.action.method_name();
            match dispatch(&hit.action, method, &self.api).await {
                Ok(()) => {
                    tracing::debug!(method, trigger = hit.trigger, "Moderation action sent");
                    report.dispatched += 1;
                }
                Err(e) => {
                    tracing::error!(
                        trigger = hit.trigger,
                        "Failed to send moderation action: {}",
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub async fn join_channel(&self, channel: &ChannelCreated) -> Result<(), DispatchError> {
        tracing::info!(
            channel_id = %channel.channel_id,
            channel_name = %channel.channel_name,
            "New public channel: {}/{}",
            channel.channel_id,
            channel.channel_name
        );
        on_channel_created(channel, &self.api).await
    }
}

// ============================================================================
// TESTS
// ============================================================================

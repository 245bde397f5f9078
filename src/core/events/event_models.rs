// Event domain models - typed view of a single Events API delivery.
//
// These are built once per webhook delivery by the classifier and dropped
// after the delivery has been handled. No HTTP or Slack client types here.

use serde::{Deserialize, Deserializer, Serialize};

/// What a webhook delivery turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// One-time `url_verification` handshake sent when the endpoint is registered.
    HandshakeChallenge { token: String },
    /// A new public channel was created. The bot should join it.
    ChannelCreated(ChannelCreated),
    /// A message posted in a channel the bot is listening to.
    Message(MessageEvent),
    /// Anything else. Acknowledged and ignored.
    Other,
}

/// The `channel` object of a `channel_created` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCreated {
    #[serde(rename = "id")]
    pub channel_id: String,
    #[serde(rename = "name", default, deserialize_with = "null_as_empty")]
    pub channel_name: String,
}

/// A `message` event. Slack omits most of these fields for some subtypes
/// (edits, deletions), so every field falls back to empty. An explicit
/// `null` is read the same as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub channel: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bot_id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl MessageEvent {
    /// Bot-authored messages carry a non-empty `bot_id` and are never moderated.
    pub fn is_bot(&self) -> bool {
        !self.bot_id.is_empty()
    }

    /// Thread timestamp, treating an empty string the same as an absent one.
    pub fn thread(&self) -> Option<&str> {
        self.thread_ts.as_deref().filter(|ts| !ts.is_empty())
    }
}

/// Body returned for a `url_verification` handshake.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

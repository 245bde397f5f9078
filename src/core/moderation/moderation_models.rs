// Moderation domain models - filters and the actions they produce.
//
// Filters are loaded once at startup and never mutated, so they are shared
// read-only across every concurrent delivery without locking.

use crate::core::events::MessageEvent;
use serde::{Deserialize, Serialize};

/// Slack method a filter invokes when one of its triggers matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterAction {
    /// `chat.postMessage` - a visible reply in the channel or thread.
    PostMessage,
    /// `chat.postEphemeral` - a reply only the offending user sees.
    PostEphemeral,
    /// Any other Web API method, passed through verbatim.
    Method(String),
}

impl FilterAction {
    pub fn method_name(&self) -> &str {
        match self {
            FilterAction::PostMessage => "chat.postMessage",
            FilterAction::PostEphemeral => "chat.postEphemeral",
            FilterAction::Method(name) => name,
        }
    }
}

impl From<String> for FilterAction {
    fn from(name: String) -> Self {
        match name.as_str() {
            "chat.postMessage" => FilterAction::PostMessage,
            "chat.postEphemeral" => FilterAction::PostEphemeral,
            _ => FilterAction::Method(name),
        }
    }
}

impl From<FilterAction> for String {
    fn from(action: FilterAction) -> Self {
        action.method_name().to_string()
    }
}

/// A rule binding trigger words to a moderation action and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Case-sensitive substrings, checked in order.
    pub triggers: Vec<String>,
    pub action: FilterAction,
    /// Text sent back when a trigger matches.
    pub message: String,
}

/// Ordered filters. Insertion order is evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<Filter>);

impl FilterSet {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parameters for one outbound moderation call.
///
/// Serialized as the JSON body of the Web API request. `thread_ts` is left
/// out entirely when the source message was not in a thread, which makes
/// Slack post a new message instead of a thread reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationAction {
    pub channel: String,
    pub user: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl ModerationAction {
    pub fn for_message(event: &MessageEvent, filter: &Filter) -> Self {
        Self {
            channel: event.channel.clone(),
            user: event.user.clone(),
            text: filter.message.clone(),
            thread_ts: event.thread().map(str::to_string),
        }
    }
}

/// One (filter, trigger word) hit and the action it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch<'a> {
    pub filter: &'a Filter,
    pub trigger: &'a str,
    pub action: ModerationAction,
}

/// Result of evaluating one message against the filter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationOutcome<'a> {
    /// Every match, in filter order then trigger order.
    pub matches: Vec<FilterMatch<'a>>,
    /// Set once any trigger matched. Gates the full-event diagnostic log.
    pub any_matched: bool,
}

/// Summary of a moderation run, mostly useful for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModerationReport {
    pub matched: usize,
    pub dispatched: usize,
    pub failed: usize,
}

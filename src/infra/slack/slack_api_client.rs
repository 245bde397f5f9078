use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::moderation::{ModerationAction, SlackApi, SlackApiError};

pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

const JOIN_METHOD: &str = "conversations.join";

/// Minimal Slack Web API client. It only exposes the calls the core layer needs.
///
/// Every call is a single JSON POST with the bot token. reqwest's client is
/// internally pooled and safe to share between tasks.
pub struct SlackApiClient {
    client: Client,
    base_url: String,
}

/// Every Web API response carries `ok`; `error` is set when it is false.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct JoinChannelRequest<'a> {
    channel: &'a str,
}

impl SlackApiClient {
    pub fn new(
        access_token: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SlackApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|e| SlackApiError::Http(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent("slack-moderator/0.2")
            .timeout(timeout)
            .build()
            .map_err(|e| SlackApiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized + Sync>(
        &self,
        method: &str,
        body: &T,
    ) -> Result<(), SlackApiError> {
        let url = format!("{}/{}", self.base_url, method);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SlackApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api: ApiResponse = resp.json().await.map_err(map_transport_error)?;
        if !api.ok {
            return Err(SlackApiError::Api(
                api.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        tracing::debug!(method, "Slack API call succeeded");
        Ok(())
    }
}

fn map_transport_error(e: reqwest::Error) -> SlackApiError {
    if e.is_timeout() {
        SlackApiError::Timeout(e.to_string())
    } else {
        SlackApiError::Http(e.to_string())
    }
}

#[async_trait]
impl SlackApi for SlackApiClient {
    async fn call_method(
        &self,
        method: &str,
        params: &ModerationAction,
    ) -> Result<(), SlackApiError> {
        self.post(method, params).await
    }

    async fn join_channel(&self, channel_id: &str) -> Result<(), SlackApiError> {
        self.post(
            JOIN_METHOD,
            &JoinChannelRequest {
                channel: channel_id,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn client(server: &MockServer) -> SlackApiClient {
        SlackApiClient::new("xoxb-test", server.base_url(), Duration::from_secs(5)).unwrap()
    }

    fn action(thread_ts: Option<&str>) -> ModerationAction {
        ModerationAction {
            channel: "C1".to_string(),
            user: "U1".to_string(),
            text: "Please avoid that word".to_string(),
            thread_ts: thread_ts.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_call_method_posts_json_with_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat.postEphemeral")
                .header("authorization", "Bearer xoxb-test")
                .json_body(json!({
                    "channel": "C1",
                    "user": "U1",
                    "text": "Please avoid that word",
                }));
            then.status(200).json_body(json!({"ok": true}));
        });

        client(&server)
            .call_method("chat.postEphemeral", &action(None))
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_call_method_includes_thread_ts_when_present() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage").json_body(json!({
                "channel": "C1",
                "user": "U1",
                "text": "Please avoid that word",
                "thread_ts": "1700000000.000100",
            }));
            then.status(200).json_body(json!({"ok": true, "ts": "1700000001.000200"}));
        });

        client(&server)
            .call_method("chat.postMessage", &action(Some("1700000000.000100")))
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_ok_false_is_api_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(200)
                .json_body(json!({"ok": false, "error": "not_in_channel"}));
        });

        let err = client(&server)
            .call_method("chat.postMessage", &action(None))
            .await
            .unwrap_err();

        assert!(matches!(err, SlackApiError::Api(ref e) if e == "not_in_channel"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(503).body("upstream down");
        });

        let err = client(&server)
            .call_method("chat.postMessage", &action(None))
            .await
            .unwrap_err();

        assert!(matches!(err, SlackApiError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_join_channel_calls_conversations_join() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/conversations.join")
                .json_body(json!({"channel": "C123"}));
            then.status(200).json_body(json!({"ok": true}));
        });

        client(&server).join_channel("C123").await.unwrap();

        mock.assert();
    }
}

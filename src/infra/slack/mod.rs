// Slack infra layer.
// - `slack_api_client.rs` talks to the Slack Web API.
// - `signature.rs` verifies that deliveries really come from Slack.

#[path = "slack_api_client.rs"]
pub mod slack_api_client;

#[path = "signature.rs"]
pub mod signature;

pub use signature::{SignatureError, SignatureVerifier};
pub use slack_api_client::SlackApiClient;

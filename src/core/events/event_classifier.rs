// Event classifier - decides what kind of delivery a raw payload is.
//
// The outer envelope is parsed first; only the nested event for the
// categories we act on is decoded into a typed struct.

use super::event_models::{ChannelCreated, InboundEvent, MessageEvent};
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum EventError {
    /// The body is not a JSON envelope at all.
    #[error("Failed to parse event payload: {0}")]
    Parse(#[source] serde_json::Error),

    /// The envelope is fine but the nested event could not be decoded.
    #[error("Failed to decode {event_type} event: {source}")]
    Classification {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    challenge: Option<serde_json::Value>,
    #[serde(default)]
    event: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChannelCreatedPayload {
    channel: ChannelCreated,
}

const URL_VERIFICATION: &str = "url_verification";
const CHANNEL_CREATED: &str = "channel_created";
const MESSAGE: &str = "message";

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Classify a raw (already signature-verified) webhook body.
pub fn classify(raw: &[u8]) -> Result<InboundEvent, EventError> {
    let envelope: Envelope = serde_json::from_slice(raw).map_err(EventError::Parse)?;

    if envelope.kind == URL_VERIFICATION {
        let challenge = envelope.challenge.unwrap_or(serde_json::Value::Null);
        let token = String::deserialize(challenge).map_err(|source| {
            EventError::Classification {
                event_type: URL_VERIFICATION.to_string(),
                source,
            }
        })?;
        return Ok(InboundEvent::HandshakeChallenge { token });
    }

    let Some(event) = envelope.event else {
        return Ok(InboundEvent::Other);
    };

    let event_type = event
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string();

    let decode_error = |source| EventError::Classification {
        event_type: event_type.clone(),
        source,
    };

    match event_type.as_str() {
        CHANNEL_CREATED => {
            let payload: ChannelCreatedPayload =
                serde_json::from_value(event).map_err(decode_error)?;
            Ok(InboundEvent::ChannelCreated(payload.channel))
        }
        MESSAGE => {
            let message: MessageEvent = serde_json::from_value(event).map_err(decode_error)?;
            Ok(InboundEvent::Message(message))
        }
        _ => Ok(InboundEvent::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_verification_yields_challenge() {
        let body = br#"{"token":"x","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#;

        let event = classify(body).unwrap();

        assert_eq!(
            event,
            InboundEvent::HandshakeChallenge {
                token: "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P".to_string()
            }
        );
    }

    #[test]
    fn test_url_verification_ignores_nested_event() {
        let body = br#"{"type":"url_verification","challenge":"abc","event":{"type":"message","text":"banned"}}"#;

        assert!(matches!(
            classify(body).unwrap(),
            InboundEvent::HandshakeChallenge { .. }
        ));
    }

    #[test]
    fn test_url_verification_without_challenge_is_classification_error() {
        let body = br#"{"type":"url_verification"}"#;

        let err = classify(body).unwrap_err();
        assert!(matches!(err, EventError::Classification { ref event_type, .. } if event_type == "url_verification"));
    }

    #[test]
    fn test_channel_created() {
        let body = br#"{
            "type": "event_callback",
            "event": {
                "type": "channel_created",
                "channel": {"id": "C123", "name": "general", "created": 1360782804, "creator": "U024BE7LH"}
            }
        }"#;

        let event = classify(body).unwrap();

        assert_eq!(
            event,
            InboundEvent::ChannelCreated(ChannelCreated {
                channel_id: "C123".to_string(),
                channel_name: "general".to_string(),
            })
        );
    }

    #[test]
    fn test_channel_created_without_channel_is_classification_error() {
        let body = br#"{"type":"event_callback","event":{"type":"channel_created"}}"#;

        let err = classify(body).unwrap_err();
        assert!(matches!(err, EventError::Classification { ref event_type, .. } if event_type == "channel_created"));
    }

    #[test]
    fn test_message_fields_are_decoded() {
        let body = br#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "channel": "C1",
                "user": "U1",
                "text": "this is banned content",
                "ts": "1355517523.000005",
                "thread_ts": "1355517500.000001"
            }
        }"#;

        let InboundEvent::Message(message) = classify(body).unwrap() else {
            panic!("expected a message event");
        };

        assert_eq!(message.channel, "C1");
        assert_eq!(message.user, "U1");
        assert_eq!(message.text, "this is banned content");
        assert_eq!(message.thread(), Some("1355517500.000001"));
        assert!(!message.is_bot());
    }

    #[test]
    fn test_bot_message_is_flagged() {
        let body = br#"{"type":"event_callback","event":{"type":"message","channel":"C1","text":"hi","bot_id":"B42"}}"#;

        let InboundEvent::Message(message) = classify(body).unwrap() else {
            panic!("expected a message event");
        };

        assert!(message.is_bot());
        assert_eq!(message.thread(), None);
    }

    #[test]
    fn test_null_message_fields_read_as_empty() {
        let body = br#"{"type":"event_callback","event":{"type":"message","channel":"C1","user":null,"text":null,"bot_id":null,"thread_ts":null}}"#;

        let InboundEvent::Message(message) = classify(body).unwrap() else {
            panic!("expected a message event");
        };

        assert_eq!(message.channel, "C1");
        assert_eq!(message.user, "");
        assert_eq!(message.text, "");
        assert!(!message.is_bot());
        assert_eq!(message.thread(), None);
    }

    #[test]
    fn test_message_with_wrong_field_type_is_classification_error() {
        let body = br#"{"type":"event_callback","event":{"type":"message","text":42}}"#;

        let err = classify(body).unwrap_err();
        assert!(matches!(err, EventError::Classification { ref event_type, .. } if event_type == "message"));
    }

    #[test]
    fn test_unknown_event_is_other() {
        let body = br#"{"type":"event_callback","event":{"type":"reaction_added","user":"U1"}}"#;
        assert_eq!(classify(body).unwrap(), InboundEvent::Other);

        let body = br#"{"type":"app_rate_limited"}"#;
        assert_eq!(classify(body).unwrap(), InboundEvent::Other);
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        assert!(matches!(classify(b"not json"), Err(EventError::Parse(_))));
        assert!(matches!(classify(b"\"hello\""), Err(EventError::Parse(_))));
    }
}

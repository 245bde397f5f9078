use axum::http::HeaderMap;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

const SIGNATURE_VERSION: &str = "v0";

/// Deliveries older (or newer) than this are treated as replays.
const MAX_CLOCK_SKEW_SECS: u64 = 60 * 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid request timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Request timestamp {0} is outside the allowed window")]
    StaleTimestamp(i64),

    #[error("Malformed signature header")]
    Malformed,

    #[error("Signature mismatch")]
    Mismatch,

    #[error("Signing secret cannot be used as an HMAC key")]
    InvalidKey,
}

/// Checks Slack's `v0` request signatures against the app signing secret.
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
        self.verify_at(headers, body, Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit "now" in unix seconds.
    pub fn verify_at(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = header(headers, TIMESTAMP_HEADER)?;
        let signature = header(headers, SIGNATURE_HEADER)?;

        let ts: i64 = timestamp
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_string()))?;
        // abs_diff: the header is untrusted and may sit at the edges of i64.
        if now.abs_diff(ts) > MAX_CLOCK_SKEW_SECS {
            return Err(SignatureError::StaleTimestamp(ts));
        }

        let digest = signature
            .strip_prefix("v0=")
            .and_then(|hex_digest| hex::decode(hex_digest).ok())
            .ok_or(SignatureError::Malformed)?;

        self.mac(timestamp, body)?
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Mismatch)
    }

    // HMAC-SHA256 over "v0:{timestamp}:{body}".
    fn mac(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(SignatureError::MissingHeader(name))
}

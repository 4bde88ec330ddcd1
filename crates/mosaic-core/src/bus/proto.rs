//! Bus wire protocol — JSON envelopes over WebSocket text frames.
//!
//! Three operations cover the whole protocol:
//!
//! - client → broker: `{"op":"subscribe","pattern":"chart/+"}`
//! - client → broker: `{"op":"publish","topic":"p2pool","payload":"<base64>"}`
//! - broker → client: `{"op":"message","topic":"chart/vix","payload":"<base64>"}`
//!
//! Payloads are opaque bytes (PNG images, JSON documents) encoded with
//! standard base64 so they survive a text transport unchanged.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

use crate::error::MosaicError;

/// Decode a base64 payload field.
pub fn decode_b64(payload: &str) -> Result<Vec<u8>, MosaicError> {
    B64.decode(payload).map_err(|e| MosaicError::Bus(format!("bad payload encoding: {e}")))
}

/// One protocol envelope, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Envelope {
    /// Register interest in a topic pattern.
    Subscribe { pattern: String },
    /// Publish a payload under a topic.
    Publish { topic: String, payload: String },
    /// A delivered message (broker → client only).
    Message { topic: String, payload: String },
}

impl Envelope {
    pub fn subscribe(pattern: &str) -> Self {
        Self::Subscribe { pattern: pattern.to_string() }
    }

    pub fn publish(topic: &str, payload: &[u8]) -> Self {
        Self::Publish { topic: topic.to_string(), payload: B64.encode(payload) }
    }

    pub fn message(topic: &str, payload: &[u8]) -> Self {
        Self::Message { topic: topic.to_string(), payload: B64.encode(payload) }
    }

    /// Serialize to the wire representation.
    pub fn to_json(&self) -> String {
        // Envelope contains only strings; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a wire frame.
    pub fn from_json(text: &str) -> Result<Self, MosaicError> {
        serde_json::from_str(text).map_err(|e| MosaicError::Bus(format!("bad envelope: {e}")))
    }

    /// Decode the base64 payload of a `Publish` or `Message` envelope.
    pub fn decode_payload(&self) -> Result<Vec<u8>, MosaicError> {
        match self {
            Envelope::Publish { payload, .. } | Envelope::Message { payload, .. } => {
                decode_b64(payload)
            }
            Envelope::Subscribe { .. } => {
                Err(MosaicError::Bus("subscribe envelope has no payload".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_round_trip() {
        let env = Envelope::publish("chart/vix", b"\x89PNG\r\n");
        let parsed = Envelope::from_json(&env.to_json()).unwrap();
        assert_eq!(parsed, env);
        assert_eq!(parsed.decode_payload().unwrap(), b"\x89PNG\r\n");
    }

    #[test]
    fn subscribe_wire_format() {
        let env = Envelope::subscribe("chart/+");
        assert_eq!(env.to_json(), r#"{"op":"subscribe","pattern":"chart/+"}"#);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Envelope::from_json("not json").is_err());
        assert!(Envelope::from_json(r#"{"op":"frobnicate"}"#).is_err());
    }
}

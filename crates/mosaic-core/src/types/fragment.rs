//! Named fragments — independently-produced pieces of visual content.

use std::sync::Arc;

/// A named, independently-produced piece of content composed into the final
/// frame. Identity is the name; a fragment is only ever replaced wholesale
/// (last write wins), never merged and never expired.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Raw payload as published on the bus (typically an encoded PNG).
    ///
    /// `Arc` so that the compositor can take a cheap copy-on-read snapshot
    /// while the ingest worker replaces the entry.
    pub payload: Arc<[u8]>,
    /// Local receipt time in milliseconds since epoch. Informational only —
    /// stale fragments are still drawn.
    pub received_at_ms: i64,
}

impl Fragment {
    pub fn new(payload: Vec<u8>, received_at_ms: i64) -> Self {
        Self { payload: payload.into(), received_at_ms }
    }
}

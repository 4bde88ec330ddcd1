//! In-process topic hub.
//!
//! A pattern-aware publish/subscribe hub over `tokio::sync::broadcast`
//! channels, one channel per subscription pattern. Used as the bus transport
//! in tests and single-process runs; the semantics (named topics, wildcard
//! subscriptions, no delivery to late subscribers) match the WebSocket
//! transport.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use super::{BusMessage, topic};

const CHANNEL_CAPACITY: usize = 64;

/// Central in-process hub. Each subscription pattern has a
/// `broadcast::Sender`; publishing fans out to every matching pattern.
///
/// Clone-able via internal Arc.
#[derive(Clone, Default)]
pub struct TopicHub {
    subs: Arc<RwLock<Vec<(String, broadcast::Sender<BusMessage>)>>>,
}

impl TopicHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a pattern. Identical patterns share one channel.
    pub fn subscribe(&self, pattern: &str) -> broadcast::Receiver<BusMessage> {
        let mut subs = self.subs.write().unwrap_or_else(|e| e.into_inner());
        if let Some((_, tx)) = subs.iter().find(|(p, _)| p == pattern) {
            return tx.subscribe();
        }
        let (tx, rx) = broadcast::channel(CHANNEL_CAPACITY);
        subs.push((pattern.to_string(), tx));
        rx
    }

    /// Publish a payload to every subscription matching `topic`.
    ///
    /// Returns the number of patterns the message was delivered to; 0 when
    /// nobody is listening.
    pub fn publish(&self, topic_name: &str, payload: &[u8]) -> usize {
        let msg = BusMessage { topic: topic_name.to_string(), payload: payload.into() };
        let subs = self.subs.read().unwrap_or_else(|e| e.into_inner());
        subs.iter()
            .filter(|(pattern, _)| topic::matches(pattern, topic_name))
            .filter(|(_, tx)| tx.send(msg.clone()).is_ok())
            .count()
    }
}

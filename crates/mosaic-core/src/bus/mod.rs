//! Publish/subscribe bus.
//!
//! The bus carries named topics with at-least-once delivery; consumers must
//! be idempotent to redelivery, which is why every piece of mosaic state has
//! replace semantics. Two transports are provided:
//!
//! - [`client::BusClient`] — WebSocket client speaking the JSON envelope in
//!   [`proto`], with auto-reconnect and subscription replay
//! - [`hub::TopicHub`] — in-process hub over `tokio::sync::broadcast`, used
//!   by tests and single-process runs
//!
//! Topic names are hierarchical (`<source>/<fragment-name>`); subscription
//! patterns support the `+` single-level wildcard ([`topic`]).

pub mod client;
pub mod hub;
pub mod proto;
pub mod topic;

use std::sync::Arc;

/// Callback invoked for each inbound bus message.
///
/// Parameters: `(topic, payload)`. Handlers must return quickly — anything
/// heavier than a channel send belongs on a worker thread.
pub type OnBusMessage = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// One inbound message as delivered by a transport.
#[derive(Debug, Clone)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Arc<[u8]>,
}

//! Ingest worker — the single serialization point for bus mutations.
//!
//! The bus callback only does a non-blocking channel send, so message
//! delivery is never stalled by decoding or by a slow render. A dedicated
//! worker drains the channel, decodes each message, and applies the result
//! to [`MarketState`]. Malformed messages are logged and dropped.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use mosaic_core::bus::OnBusMessage;
use tracing::{debug, info, warn};

use crate::decode::{self, Route};
use crate::state::MarketState;

/// Channel depth between the bus callback and the worker.
const INGEST_CHANNEL_CAP: usize = 8192;

/// One raw inbound message, as handed over by the bus callback.
#[derive(Debug)]
pub struct RawBusMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Create the ingest channel pair.
pub fn channel() -> (Sender<RawBusMessage>, Receiver<RawBusMessage>) {
    crossbeam_channel::bounded(INGEST_CHANNEL_CAP)
}

/// Build the bus callback that feeds the ingest channel.
pub fn bus_callback(tx: Sender<RawBusMessage>) -> OnBusMessage {
    Arc::new(move |topic, payload| {
        let msg = RawBusMessage { topic: topic.to_string(), payload: payload.to_vec() };
        if tx.try_send(msg).is_err() {
            warn!("ingest channel full, dropping message on '{topic}'");
        }
    })
}

/// Run the ingest loop on the calling thread until the channel closes.
///
/// Intended to run under `tokio::task::spawn_blocking`; dropping all
/// senders (i.e. stopping the bus client) ends the loop.
pub fn run_ingest_loop(
    rx: Receiver<RawBusMessage>,
    routes: &[Route],
    symbol: &str,
    state: &MarketState,
) {
    info!("ingest loop started ({} routes)", routes.len());

    while let Ok(msg) = rx.recv() {
        let Some(family) = decode::route(routes, &msg.topic) else {
            debug!("no route for topic '{}'", msg.topic);
            continue;
        };
        match decode::decode(family, &msg.topic, &msg.payload, symbol) {
            Ok(event) => state.apply(event),
            Err(e) => warn!("dropping message on '{}': {e}", msg.topic),
        }
    }

    info!("ingest loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::TopicFamily;
    use mosaic_core::PriceSample;

    fn routes() -> Vec<Route> {
        vec![
            Route { pattern: "chart/+".into(), family: TopicFamily::Fragment },
            Route { pattern: "poloniex/public".into(), family: TopicFamily::Candles },
        ]
    }

    #[test]
    fn worker_applies_routed_messages_and_drops_the_rest() {
        let state = MarketState::new(144);
        let (tx, rx) = channel();
        let cb = bus_callback(tx);

        cb("chart/vix", b"png");
        cb("poloniex/public", br#"{"data":[{"symbol":"XMR_USDT","startTime":10,"close":"1.5"}]}"#);
        cb("poloniex/public", b"not json"); // malformed: dropped
        cb("unknown/topic", b"whatever"); // unrouted: dropped

        drop(cb);
        run_ingest_loop(rx, &routes(), "XMR_USDT", &state);

        assert!(state.fragments().get("vix").is_some());
        assert_eq!(state.series_snapshot(), vec![PriceSample::new(10, 1.5)]);
    }

    #[tokio::test]
    async fn hub_transport_feeds_the_pipeline() {
        use mosaic_core::bus::hub::TopicHub;

        let hub = TopicHub::new();
        let mut bus_rx = hub.subscribe("chart/+");

        let state = MarketState::new(144);
        let (tx, rx) = channel();
        let cb = bus_callback(tx);

        assert_eq!(hub.publish("chart/gold", b"png"), 1);
        let msg = bus_rx.recv().await.unwrap();
        cb(&msg.topic, &msg.payload);

        drop(cb);
        run_ingest_loop(rx, &routes(), "XMR_USDT", &state);
        assert!(state.fragments().get("gold").is_some());
    }
}

//! WebSocket bus client with auto-reconnect.
//!
//! The client runs as a tokio task that:
//! 1. Connects to the broker endpoint.
//! 2. Sends one subscribe envelope per configured pattern.
//! 3. Publishes each pattern's refresh-request message (if any) so producers
//!    re-send their retained fragments to a freshly-connected consumer.
//! 4. Forwards inbound `message` envelopes to a callback.
//! 5. Automatically reconnects on disconnection with exponential backoff,
//!    replaying the subscriptions and refresh requests each time.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::{OnBusMessage, proto, proto::Envelope};

/// One configured subscription.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Topic pattern (`+` matches one level).
    pub pattern: String,
    /// Optional control message published on the pattern's parent topic
    /// after subscribing, asking the producer for a full re-send.
    pub request: Option<String>,
}

impl Subscription {
    /// Topic the refresh request is published on: the pattern minus its
    /// final level (`chart/+` → `chart`).
    fn request_topic(&self) -> &str {
        self.pattern.rsplit_once('/').map(|(parent, _)| parent).unwrap_or(&self.pattern)
    }
}

/// Configuration for the bus client.
#[derive(Debug, Clone)]
pub struct BusClientConfig {
    /// Broker WebSocket URL (e.g. `ws://localhost:9001/bus`).
    pub url: String,
    /// Subscriptions established after every (re)connect.
    pub subscriptions: Vec<Subscription>,
    /// Interval between WebSocket ping frames, if any.
    pub ping_interval: Option<Duration>,
}

/// A bus client managed by a background tokio task.
pub struct BusClient {
    config: BusClientConfig,
    outbound_tx: Option<mpsc::Sender<Envelope>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl BusClient {
    /// Create a new (not yet started) client.
    pub fn new(config: BusClientConfig) -> Self {
        Self { config, outbound_tx: None, shutdown_tx: None, task: None }
    }

    /// Start the connection task. Inbound messages are forwarded to `on_msg`.
    pub fn start(&mut self, on_msg: OnBusMessage) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (outbound_tx, outbound_rx) = mpsc::channel::<Envelope>(64);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            connection_loop(config, on_msg, outbound_rx, shutdown_rx).await;
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.outbound_tx = Some(outbound_tx);
        self.task = Some(task);
    }

    /// Publish a payload under a topic.
    pub async fn publish(&self, topic: &str, payload: &[u8]) -> anyhow::Result<()> {
        if let Some(tx) = &self.outbound_tx {
            tx.send(Envelope::publish(topic, payload)).await?;
        }
        Ok(())
    }

    /// Stop the connection and wait for the task to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Awaits the next ping deadline, or forever when pinging is disabled.
async fn tick(interval: &mut Option<tokio::time::Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Main connection loop — connects, subscribes, reads, pings, reconnects.
async fn connection_loop(
    config: BusClientConfig,
    on_msg: OnBusMessage,
    mut outbound_rx: mpsc::Receiver<Envelope>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut backoff = Duration::from_millis(100);
    let max_backoff = Duration::from_secs(30);

    loop {
        if *shutdown_rx.borrow() {
            info!("[bus] shutdown requested");
            return;
        }

        info!("[bus] connecting to {}", config.url);

        let ws_stream = match tokio_tungstenite::connect_async(&config.url).await {
            Ok((s, _response)) => {
                backoff = Duration::from_millis(100); // reset backoff on success
                info!("[bus] connected");
                s
            }
            Err(e) => {
                error!("[bus] connection failed: {e}, retrying in {backoff:?}");
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {},
                    _ = shutdown_rx.changed() => return,
                }
                backoff = (backoff * 2).min(max_backoff);
                continue;
            }
        };

        let (mut ws_write, mut ws_read) = ws_stream.split();

        // Replay subscriptions, then ask producers for a full re-send.
        let mut handshake_ok = true;
        for sub in &config.subscriptions {
            debug!("[bus] subscribing: {}", sub.pattern);
            let env = Envelope::subscribe(&sub.pattern);
            if let Err(e) = ws_write.send(Message::Text(env.to_json().into())).await {
                error!("[bus] subscribe send failed: {e}");
                handshake_ok = false;
                break;
            }
            if let Some(request) = &sub.request {
                let env = Envelope::publish(sub.request_topic(), request.as_bytes());
                if let Err(e) = ws_write.send(Message::Text(env.to_json().into())).await {
                    error!("[bus] refresh request send failed: {e}");
                    handshake_ok = false;
                    break;
                }
            }
        }
        if !handshake_ok {
            continue;
        }

        let mut ping_interval = config.ping_interval.map(tokio::time::interval);

        // Main read/write loop
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("[bus] shutdown signal received");
                    let _ = ws_write.close().await;
                    return;
                }

                msg = ws_read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match Envelope::from_json(&text) {
                                Ok(Envelope::Message { topic, payload }) => {
                                    match proto::decode_b64(&payload) {
                                        Ok(bytes) => on_msg(&topic, &bytes),
                                        Err(e) => warn!("[bus] dropping message on '{topic}': {e}"),
                                    }
                                }
                                Ok(other) => debug!("[bus] ignoring envelope: {other:?}"),
                                Err(e) => warn!("[bus] dropping frame: {e}"),
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            warn!("[bus] received close frame");
                            break;
                        }
                        Some(Err(e)) => {
                            error!("[bus] read error: {e}");
                            break;
                        }
                        None => {
                            warn!("[bus] stream ended");
                            break;
                        }
                        _ => {} // Binary, Pong, Frame — ignore
                    }
                }

                Some(env) = outbound_rx.recv() => {
                    if let Err(e) = ws_write.send(Message::Text(env.to_json().into())).await {
                        error!("[bus] send error: {e}");
                        break;
                    }
                }

                _ = tick(&mut ping_interval) => {
                    if let Err(e) = ws_write.send(Message::Ping(vec![].into())).await {
                        error!("[bus] ping send error: {e}");
                        break;
                    }
                }
            }
        }

        // Disconnected — will reconnect at the top of the outer loop.
        warn!("[bus] disconnected, reconnecting in {backoff:?}");
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {},
            _ = shutdown_rx.changed() => return,
        }
        backoff = (backoff * 2).min(max_backoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_topic_is_pattern_parent() {
        let sub = Subscription { pattern: "chart/+".into(), request: Some("REQUEST ALL".into()) };
        assert_eq!(sub.request_topic(), "chart");

        let flat = Subscription { pattern: "p2pool".into(), request: None };
        assert_eq!(flat.request_topic(), "p2pool");
    }
}

//! Configuration parsing for the mosaic streamer.
//!
//! The consumer process reads all of its settings from a single JSON config
//! file: broker address, output destination, canvas geometry, the static
//! frame layout, and the per-topic-family subscriptions.
//!
//! # Example config
//!
//! ```json
//! {
//!   "module_name": "mosaic-streamer",
//!   "broker_url": "ws://localhost:9001/bus",
//!   "output": "rtmp://localhost/live/mosaic",
//!   "canvas": { "width": 1216, "height": 684, "background": [0, 255, 0] },
//!   "update_fps": 5,
//!   "movie_fps": 15,
//!   "subscriptions": [
//!     { "pattern": "chart/+", "family": "fragment", "request": "REQUEST ALL" },
//!     { "pattern": "poloniex/public", "family": "candles" },
//!     { "pattern": "poloniex/account", "family": "account" },
//!     { "pattern": "p2pool/+", "family": "pool", "request": "REQUEST ALL" }
//!   ],
//!   "series": {
//!     "symbol": "XMR_USDT",
//!     "cap": 144,
//!     "backfill_url": "https://poloniex.com/proxy/sapi/spot/quotation/candlesticks?symbol=XMR_USDT&interval=MINUTE_10&limit=144"
//!   },
//!   "wallet": { "rpc_url": "http://localhost:18082/json_rpc", "poll_interval_sec": 600 },
//!   "cells": [
//!     { "name": "sunday_dow", "kind": "image", "x": 20, "y": 20, "w": 187, "h": 154 },
//!     { "name": "xmrusdt", "kind": "price_chart", "x": 601, "y": 194, "w": 187, "h": 154 },
//!     { "name": "balance", "kind": "balance", "x": 207, "y": 502, "w": 187, "h": 114 },
//!     { "name": "p2pool", "kind": "pool", "x": 414, "y": 368, "w": 122, "h": 64 }
//!   ]
//! }
//! ```

use serde::Deserialize;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module name — log file prefix and log tag.
    pub module_name: Option<String>,

    /// Optional directory for daily-rotating log files.
    pub log_path: Option<String>,

    /// Broker WebSocket URL.
    pub broker_url: String,

    /// Output destination: an `rtmp://` URL handed to the encoder, or a
    /// plain path for raw-frame file output.
    pub output: String,

    /// Output canvas geometry.
    pub canvas: CanvasConfig,

    /// Compositor tick rate in frames per second (default: 5).
    pub update_fps: Option<u32>,

    /// Encoder output frame rate (default: 15).
    pub movie_fps: Option<u32>,

    /// Bus subscriptions, one per topic family.
    pub subscriptions: Vec<SubscriptionConfig>,

    /// Price series settings.
    pub series: SeriesConfig,

    /// Wallet poll settings. Absent disables the refresh scheduler.
    pub wallet: Option<WalletConfig>,

    /// Static frame layout.
    pub cells: Vec<CellConfig>,
}

impl AppConfig {
    pub fn module_name(&self) -> String {
        self.module_name.clone().unwrap_or_else(|| "mosaic-streamer".to_string())
    }

    pub fn update_fps(&self) -> u32 {
        self.update_fps.unwrap_or(5).max(1)
    }

    pub fn movie_fps(&self) -> u32 {
        self.movie_fps.unwrap_or(15).max(1)
    }
}

/// Output canvas geometry and background color.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Background as `[r, g, b]`, 0–255 (default: chroma-key green).
    pub background: Option<[u8; 3]>,
}

impl CanvasConfig {
    pub fn background(&self) -> [u8; 3] {
        self.background.unwrap_or([0, 255, 0])
    }
}

/// One bus subscription: a pattern, its topic family, and an optional
/// refresh-request control message.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    pub pattern: String,
    /// `"fragment"`, `"candles"`, `"account"`, or `"pool"`.
    pub family: String,
    /// Control message published on the pattern's parent topic after
    /// subscribing (e.g. `"REQUEST ALL"`).
    pub request: Option<String>,
}

/// Price series settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesConfig {
    /// Instrument symbol candle updates are filtered on (e.g. `"XMR_USDT"`).
    pub symbol: String,
    /// Maximum number of retained samples (default: 144).
    pub cap: Option<usize>,
    /// HTTP endpoint for the startup bulk backfill.
    pub backfill_url: String,
}

impl SeriesConfig {
    pub fn cap(&self) -> usize {
        self.cap.unwrap_or(144).max(2)
    }
}

/// Wallet JSON-RPC poll settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub rpc_url: String,
    /// Poll interval in seconds (default: 600).
    pub poll_interval_sec: Option<u64>,
}

impl WalletConfig {
    pub fn poll_interval_sec(&self) -> u64 {
        self.poll_interval_sec.unwrap_or(600).max(1)
    }
}

/// One layout cell: a named rectangle and what gets painted into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CellConfig {
    /// Fragment name for `image` cells; a label otherwise.
    pub name: String,
    /// `"image"`, `"price_chart"`, `"balance"`, or `"pool"`.
    pub kind: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "broker_url": "ws://localhost:9001/bus",
        "output": "rtmp://localhost/live/mosaic",
        "canvas": { "width": 1216, "height": 684 },
        "subscriptions": [
            { "pattern": "chart/+", "family": "fragment", "request": "REQUEST ALL" },
            { "pattern": "poloniex/public", "family": "candles" }
        ],
        "series": { "symbol": "XMR_USDT", "backfill_url": "http://example/candles" },
        "cells": [
            { "name": "vix", "kind": "image", "x": 20, "y": 20, "w": 187, "h": 154 }
        ]
    }"#;

    #[test]
    fn parses_sample_with_defaults() {
        let config: AppConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.update_fps(), 5);
        assert_eq!(config.movie_fps(), 15);
        assert_eq!(config.series.cap(), 144);
        assert_eq!(config.canvas.background(), [0, 255, 0]);
        assert_eq!(config.module_name(), "mosaic-streamer");
        assert_eq!(config.subscriptions.len(), 2);
        assert_eq!(config.subscriptions[0].request.as_deref(), Some("REQUEST ALL"));
        assert_eq!(config.cells[0].kind, "image");
    }

    #[test]
    fn rejects_missing_required_fields() {
        let result: Result<AppConfig, _> = serde_json::from_str(r#"{ "broker_url": "x" }"#);
        assert!(result.is_err());
    }
}

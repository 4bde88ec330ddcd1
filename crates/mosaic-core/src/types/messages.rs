//! Tagged bus events — one variant per topic family.
//!
//! Inbound bus payloads are duck-typed JSON (or raw image bytes). The decode
//! step in `mosaic-feed` turns each of them into exactly one of these
//! variants, so downstream code never probes for optional keys.

use super::market::{AccountSnapshot, PoolStatus, PriceSample};

/// A decoded inbound bus message.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// A named chart fragment (encoded PNG) from a scraper producer.
    Fragment { name: String, payload: Vec<u8> },
    /// Incremental candle updates for the tracked symbol, in arrival order.
    Candles(Vec<PriceSample>),
    /// Whole-snapshot account update.
    Account(AccountSnapshot),
    /// Mining-pool status update.
    Pool(PoolStatus),
}

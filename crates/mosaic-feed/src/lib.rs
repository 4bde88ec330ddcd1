//! # mosaic-feed
//!
//! Market-data aggregation for the mosaic streamer.
//!
//! ## Architecture
//!
//! The bus callback pushes raw `(topic, payload)` messages into a bounded
//! channel; a dedicated ingest worker drains it, decodes each message into a
//! typed [`mosaic_core::BusEvent`], and applies it to the shared
//! [`state::MarketState`]. The compositor and the refresh scheduler read
//! that state with copy-on-read snapshots — neither domain ever blocks the
//! other.
//!
//! ```text
//! bus callback ──► channel ──► ingest worker ──► MarketState ◄── compositor tick
//!                                                    ▲
//!                              refresh scheduler ────┘ (wallet poll)
//! ```
//!
//! ## Modules
//!
//! - [`state`] — fragment store + shared market state
//! - [`series`] — bounded, ordered price series
//! - [`decode`] — typed per-topic-family payload decoding
//! - [`ingest`] — channel-draining worker loop
//! - [`backfill`] — startup bulk candle fetch
//! - [`wallet`] — wallet JSON-RPC poll
//! - [`scheduler`] — periodic refresh timer

pub mod backfill;
pub mod decode;
pub mod ingest;
pub mod scheduler;
pub mod series;
pub mod state;
pub mod wallet;

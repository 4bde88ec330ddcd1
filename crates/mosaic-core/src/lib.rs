//! # mosaic-core
//!
//! Core crate for the market mosaic streamer, providing:
//!
//! - **Types** (`types`) — fragments, price samples, account/pool snapshots,
//!   typed bus events
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — domain-specific `MosaicError` via thiserror
//! - **Bus** (`bus`) — publish/subscribe client over WebSocket, topic pattern
//!   matching, in-process topic hub
//! - **Time utilities** (`time_util`) — millisecond epoch timestamps
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod bus;
pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;

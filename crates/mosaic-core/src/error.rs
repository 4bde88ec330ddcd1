//! Typed error definitions for the mosaic streamer.
//!
//! Provides [`MosaicError`] for domain-specific errors that are more
//! informative than plain `anyhow::Error` strings. All variants implement
//! `std::error::Error` via `thiserror`, so they integrate seamlessly with
//! `anyhow::Result`.

use thiserror::Error;

/// Domain-specific errors for the mosaic streamer.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Bus connection, envelope, or topic error.
    #[error("bus error: {0}")]
    Bus(String),

    /// Inbound payload decode error — the message is dropped, never applied.
    #[error("decode error: {0}")]
    Decode(String),

    /// Backfill or wallet HTTP/RPC error.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Cell or frame rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// Output sink spawn or write error.
    #[error("sink error: {0}")]
    Sink(String),
}

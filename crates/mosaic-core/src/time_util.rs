//! Millisecond-resolution epoch timestamps.
//!
//! Everything in the mosaic pipeline that carries a wall-clock time uses
//! milliseconds since the Unix epoch, matching the candle `startTime`
//! convention of the upstream exchange API.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Current time as **microseconds** since Unix epoch.
#[inline]
pub fn now_us() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as i64
}

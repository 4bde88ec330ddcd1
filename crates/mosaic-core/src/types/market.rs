//! Market, account, and mining-pool value types.

/// One close-price sample of a candle series.
///
/// `start_time_ms` is the candle open time in milliseconds since epoch. A
/// series holds at most one sample per distinct `start_time_ms`, ordered
/// by non-decreasing start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub start_time_ms: i64,
    pub close: f64,
}

impl PriceSample {
    pub fn new(start_time_ms: i64, close: f64) -> Self {
        Self { start_time_ms, close }
    }
}

/// Futures account snapshot from the exchange's private stream.
///
/// Replaced wholesale on every account message. Absent fields render as
/// "unknown" — they are never synthesized from previous values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountSnapshot {
    /// Account equity in quote currency.
    pub equity: Option<f64>,
    /// Unrealized profit and loss in quote currency.
    pub unrealized_pnl: Option<f64>,
}

/// Wallet balance from the periodic wallet RPC poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalletBalance {
    /// Total balance in XMR (includes locked outputs).
    pub total_xmr: f64,
    /// Spendable balance in XMR.
    pub unlocked_xmr: f64,
}

/// Mining-pool status: recent share / uncle / payout activity.
///
/// Each vector holds one slot per observation window, decoded from the
/// producer's hex-digit strings (one digit per slot, most recent last).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStatus {
    pub shares: Vec<u64>,
    pub uncles: Vec<u64>,
    pub payouts: Vec<u64>,
}

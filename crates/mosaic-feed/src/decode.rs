//! Typed decoding of inbound bus payloads.
//!
//! Every subscription is configured with a topic *family*; this module turns
//! a raw `(family, topic, payload)` triple into exactly one tagged
//! [`BusEvent`] or a [`MosaicError::Decode`]. A decode failure drops the
//! message — it never mutates state and never crashes the process.

use mosaic_core::bus::topic;
use mosaic_core::error::MosaicError;
use mosaic_core::{AccountSnapshot, BusEvent, PoolStatus, PriceSample};

/// Topic families the consumer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicFamily {
    /// Named chart fragment — payload is an encoded image, name is the
    /// topic's last level.
    Fragment,
    /// Streaming candle updates for the tracked symbol.
    Candles,
    /// Whole-snapshot account update.
    Account,
    /// Mining-pool status.
    Pool,
}

impl TopicFamily {
    /// Parse the config string form.
    pub fn parse(s: &str) -> Result<Self, MosaicError> {
        match s {
            "fragment" => Ok(Self::Fragment),
            "candles" => Ok(Self::Candles),
            "account" => Ok(Self::Account),
            "pool" => Ok(Self::Pool),
            other => Err(MosaicError::Config(format!("unknown topic family: {other}"))),
        }
    }
}

/// One ingest route: pattern → family.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: String,
    pub family: TopicFamily,
}

/// Find the family for a topic, first match wins.
pub fn route(routes: &[Route], topic_name: &str) -> Option<TopicFamily> {
    routes.iter().find(|r| topic::matches(&r.pattern, topic_name)).map(|r| r.family)
}

/// Decode one inbound message into a typed event.
///
/// `symbol` is the tracked instrument for candle updates; candles for other
/// symbols are silently skipped.
pub fn decode(
    family: TopicFamily,
    topic_name: &str,
    payload: &[u8],
    symbol: &str,
) -> Result<BusEvent, MosaicError> {
    match family {
        TopicFamily::Fragment => Ok(BusEvent::Fragment {
            name: topic::leaf(topic_name).to_string(),
            payload: payload.to_vec(),
        }),
        TopicFamily::Candles => decode_candles(payload, symbol).map(BusEvent::Candles),
        TopicFamily::Account => decode_account(payload).map(BusEvent::Account),
        TopicFamily::Pool => decode_pool(payload).map(BusEvent::Pool),
    }
}

fn parse_json(payload: &[u8]) -> Result<serde_json::Value, MosaicError> {
    serde_json::from_slice(payload).map_err(|e| MosaicError::Decode(format!("bad json: {e}")))
}

/// Parse a JSON value (string or number) as `f64`.
///
/// Handles the common exchange pattern where numeric values may be encoded
/// as either JSON strings (`"123.5"`) or native numbers (`123.5`).
#[inline]
pub fn parse_str_f64(v: Option<&serde_json::Value>) -> Option<f64> {
    let v = v?;
    if let Some(s) = v.as_str() {
        fast_float2::parse(s).ok()
    } else {
        v.as_f64()
    }
}

/// Parse a JSON value (string or number) as `i64`.
#[inline]
pub fn parse_str_i64(v: Option<&serde_json::Value>) -> Option<i64> {
    let v = v?;
    if let Some(s) = v.as_str() {
        s.parse().ok()
    } else {
        v.as_i64()
    }
}

/// Candle update: `{"data":[{"symbol":"XMR_USDT","startTime":...,"close":"..."}]}`.
///
/// Entries with a different symbol or missing fields are skipped, matching
/// the producer's habit of batching several instruments per message.
fn decode_candles(payload: &[u8], symbol: &str) -> Result<Vec<PriceSample>, MosaicError> {
    let v = parse_json(payload)?;
    let data = v
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| MosaicError::Decode("candle message without data array".into()))?;

    let samples = data
        .iter()
        .filter(|entry| entry.get("symbol").and_then(|s| s.as_str()) == Some(symbol))
        .filter_map(|entry| {
            let start_time_ms = parse_str_i64(entry.get("startTime"))?;
            let close = parse_str_f64(entry.get("close"))?;
            Some(PriceSample::new(start_time_ms, close))
        })
        .collect();
    Ok(samples)
}

/// Account update: `{"eq":"123.4","upl":"-5.6"}`, both fields optional.
fn decode_account(payload: &[u8]) -> Result<AccountSnapshot, MosaicError> {
    let v = parse_json(payload)?;
    if !v.is_object() {
        return Err(MosaicError::Decode("account message is not an object".into()));
    }
    Ok(AccountSnapshot {
        equity: parse_str_f64(v.get("eq")),
        unrealized_pnl: parse_str_f64(v.get("upl")),
    })
}

/// Pool status: three strings of hex digits, one digit per slot.
fn decode_pool(payload: &[u8]) -> Result<PoolStatus, MosaicError> {
    let v = parse_json(payload)?;
    Ok(PoolStatus {
        shares: hex_digits(&v, "shares")?,
        uncles: hex_digits(&v, "uncles")?,
        payouts: hex_digits(&v, "payouts")?,
    })
}

fn hex_digits(v: &serde_json::Value, key: &str) -> Result<Vec<u64>, MosaicError> {
    let s = v
        .get(key)
        .and_then(|s| s.as_str())
        .ok_or_else(|| MosaicError::Decode(format!("pool message missing '{key}'")))?;
    s.chars()
        .map(|c| {
            c.to_digit(16)
                .map(u64::from)
                .ok_or_else(|| MosaicError::Decode(format!("non-hex digit in '{key}': {c:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_first_matching_pattern() {
        let routes = vec![
            Route { pattern: "chart/+".into(), family: TopicFamily::Fragment },
            Route { pattern: "poloniex/public".into(), family: TopicFamily::Candles },
        ];
        assert_eq!(route(&routes, "chart/vix"), Some(TopicFamily::Fragment));
        assert_eq!(route(&routes, "poloniex/public"), Some(TopicFamily::Candles));
        assert_eq!(route(&routes, "poloniex/account"), None);
    }

    #[test]
    fn decode_fragment_uses_topic_leaf() {
        let event = decode(TopicFamily::Fragment, "chart/gold_sunday", b"png-bytes", "X").unwrap();
        assert_eq!(
            event,
            BusEvent::Fragment { name: "gold_sunday".into(), payload: b"png-bytes".to_vec() }
        );
    }

    #[test]
    fn decode_candles_filters_symbol() {
        let json = br#"{"data":[
            {"symbol":"XMR_USDT","startTime":1700000000000,"close":"160.12"},
            {"symbol":"BTC_USDT","startTime":1700000000000,"close":"90000"},
            {"symbol":"XMR_USDT","startTime":1700000600000,"close":161.0}
        ]}"#;
        let event = decode(TopicFamily::Candles, "poloniex/public", json, "XMR_USDT").unwrap();
        assert_eq!(
            event,
            BusEvent::Candles(vec![
                PriceSample::new(1_700_000_000_000, 160.12),
                PriceSample::new(1_700_000_600_000, 161.0),
            ])
        );
    }

    #[test]
    fn decode_candles_without_data_is_an_error() {
        let err = decode(TopicFamily::Candles, "poloniex/public", b"{\"event\":\"pong\"}", "X");
        assert!(err.is_err());
    }

    #[test]
    fn decode_account_optional_fields() {
        let event =
            decode(TopicFamily::Account, "poloniex/account", br#"{"eq":"52.1"}"#, "X").unwrap();
        assert_eq!(
            event,
            BusEvent::Account(AccountSnapshot { equity: Some(52.1), unrealized_pnl: None })
        );
    }

    #[test]
    fn decode_pool_hex_digits() {
        let json = br#"{"shares":"00a1","uncles":"0000","payouts":"f000"}"#;
        let event = decode(TopicFamily::Pool, "p2pool/rig", json, "X").unwrap();
        assert_eq!(
            event,
            BusEvent::Pool(PoolStatus {
                shares: vec![0, 0, 10, 1],
                uncles: vec![0, 0, 0, 0],
                payouts: vec![15, 0, 0, 0],
            })
        );
    }

    #[test]
    fn malformed_payloads_are_errors_not_panics() {
        assert!(decode(TopicFamily::Candles, "t", b"not json", "X").is_err());
        assert!(decode(TopicFamily::Account, "t", b"[1,2,3]", "X").is_err());
        assert!(decode(TopicFamily::Pool, "t", br#"{"shares":"zz"}"#, "X").is_err());
    }
}

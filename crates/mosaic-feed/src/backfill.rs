//! Startup bulk backfill of the price series.
//!
//! One HTTP GET against the exchange's candlestick endpoint, returning
//! `{"code":200,"data":[[startTime, low, high, close, ...], ...]}` rows in
//! ascending start-time order. Row index 0 is the start time in
//! milliseconds, index 3 the close price.

use mosaic_core::PriceSample;
use mosaic_core::error::MosaicError;
use tracing::info;

use crate::decode::{parse_str_f64, parse_str_i64};

/// Column indices in a candlestick row.
const COL_START_TIME: usize = 0;
const COL_CLOSE: usize = 3;

/// Fetch and parse the backfill batch.
pub async fn fetch_price_history(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<PriceSample>, MosaicError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| MosaicError::Upstream(format!("backfill request failed: {e}")))?;

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| MosaicError::Upstream(format!("backfill body: {e}")))?;

    let samples = parse_candle_rows(&body)?;
    info!("backfill fetched {} samples", samples.len());
    Ok(samples)
}

/// Parse the API response into ordered samples.
pub fn parse_candle_rows(body: &serde_json::Value) -> Result<Vec<PriceSample>, MosaicError> {
    if body.get("code").and_then(|c| c.as_i64()) != Some(200) {
        let msg = body.get("message").and_then(|m| m.as_str()).unwrap_or("unknown error");
        return Err(MosaicError::Upstream(format!("backfill API error: {msg}")));
    }
    let rows = body
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| MosaicError::Upstream("backfill response without data array".into()))?;

    rows.iter()
        .map(|row| {
            let row = row
                .as_array()
                .ok_or_else(|| MosaicError::Upstream("candle row is not an array".into()))?;
            let start_time_ms = parse_str_i64(row.get(COL_START_TIME))
                .ok_or_else(|| MosaicError::Upstream("candle row missing start time".into()))?;
            let close = parse_str_f64(row.get(COL_CLOSE))
                .ok_or_else(|| MosaicError::Upstream("candle row missing close".into()))?;
            Ok(PriceSample::new(start_time_ms, close))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{"code":200,"data":[
                [1700000000000, "159.0", "161.0", "160.12", "1000"],
                [1700000600000, "160.0", "162.0", "161.30", "900"]
            ]}"#,
        )
        .unwrap();
        let samples = parse_candle_rows(&body).unwrap();
        assert_eq!(
            samples,
            vec![
                PriceSample::new(1_700_000_000_000, 160.12),
                PriceSample::new(1_700_000_600_000, 161.30),
            ]
        );
    }

    #[test]
    fn non_200_code_is_an_error() {
        let body: serde_json::Value =
            serde_json::from_str(r#"{"code":500,"message":"maintenance"}"#).unwrap();
        let err = parse_candle_rows(&body).unwrap_err();
        assert!(err.to_string().contains("maintenance"));
    }

    #[test]
    fn malformed_row_is_an_error() {
        let body: serde_json::Value =
            serde_json::from_str(r#"{"code":200,"data":[[null, 1, 2]]}"#).unwrap();
        assert!(parse_candle_rows(&body).is_err());
    }
}

//! Wallet JSON-RPC poll.
//!
//! Talks to a local wallet RPC daemon: `refresh` to sync, then
//! `get_balance` for the total and unlocked balances. Amounts arrive in
//! piconero (1e-12 XMR).

use mosaic_core::WalletBalance;
use mosaic_core::error::MosaicError;
use tracing::debug;

const PICO_PER_XMR: f64 = 1e12;

/// Client for one wallet RPC endpoint.
#[derive(Clone)]
pub struct WalletClient {
    http: reqwest::Client,
    rpc_url: String,
}

impl WalletClient {
    pub fn new(http: reqwest::Client, rpc_url: String) -> Self {
        Self { http, rpc_url }
    }

    /// Sync the wallet and read its balance.
    pub async fn poll_balance(&self) -> Result<WalletBalance, MosaicError> {
        self.call("refresh", serde_json::json!({})).await?;

        let result = self
            .call(
                "get_balance",
                serde_json::json!({ "account_index": 0, "address_indices": [0] }),
            )
            .await?;

        let total = result.get("balance").and_then(|b| b.as_u64()).ok_or_else(|| {
            MosaicError::Upstream("get_balance response missing 'balance'".into())
        })?;
        let unlocked = result.get("unlocked_balance").and_then(|b| b.as_u64()).ok_or_else(
            || MosaicError::Upstream("get_balance response missing 'unlocked_balance'".into()),
        )?;

        let balance = WalletBalance {
            total_xmr: total as f64 / PICO_PER_XMR,
            unlocked_xmr: unlocked as f64 / PICO_PER_XMR,
        };
        debug!("wallet balance: {balance:?}");
        Ok(balance)
    }

    /// One JSON-RPC 2.0 call, returning the `result` object.
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, MosaicError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": method,
            "params": params,
        });

        let response: serde_json::Value = self
            .http
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MosaicError::Upstream(format!("wallet rpc '{method}': {e}")))?
            .json()
            .await
            .map_err(|e| MosaicError::Upstream(format!("wallet rpc '{method}' body: {e}")))?;

        if let Some(error) = response.get("error") {
            let msg = error.get("message").and_then(|m| m.as_str()).unwrap_or("unknown");
            return Err(MosaicError::Upstream(format!("wallet rpc '{method}' error: {msg}")));
        }
        Ok(response.get("result").cloned().unwrap_or(serde_json::Value::Null))
    }
}

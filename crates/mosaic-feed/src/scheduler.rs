//! Periodic refresh scheduler.
//!
//! A single repeating timer, independent of the frame tick, that runs a
//! balance poll and writes the result into the shared state. Failure policy
//! is stale-but-present: an error keeps the previous snapshot value instead
//! of clearing it, so a transient RPC hiccup never blanks the frame.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mosaic_core::WalletBalance;
use mosaic_core::error::MosaicError;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::state::MarketState;

/// Spawn the refresh task. The first poll runs immediately; ticks missed
/// under load are skipped, never replayed.
///
/// `poll` is the balance source — [`crate::wallet::WalletClient`] in
/// production, a stub in tests.
pub fn spawn_refresh<F, Fut>(
    state: Arc<MarketState>,
    poll: F,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<WalletBalance, MosaicError>> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("refresh scheduler started (period {period:?})");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match poll().await {
                        Ok(balance) => state.set_wallet(balance),
                        // Keep the last good value on failure.
                        Err(e) => warn!("balance poll failed, keeping previous value: {e}"),
                    }
                }
                _ = shutdown_rx.changed() => {
                    info!("refresh scheduler stopped");
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn failed_poll_retains_last_good_value() {
        let state = MarketState::new(144);
        let calls = Arc::new(AtomicUsize::new(0));

        let poll_calls = calls.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = spawn_refresh(
            state.clone(),
            move || {
                let n = poll_calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 => Ok(WalletBalance { total_xmr: 2.0, unlocked_xmr: 1.5 }),
                        1 => Err(MosaicError::Upstream("rpc down".into())),
                        _ => Ok(WalletBalance { total_xmr: 2.5, unlocked_xmr: 2.5 }),
                    }
                }
            },
            Duration::from_secs(600),
            shutdown_rx,
        );

        // First poll runs immediately.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.wallet().unwrap().total_xmr, 2.0);

        // Second poll fails; the previous value stays visible.
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.wallet().unwrap().total_xmr, 2.0);

        // Third poll succeeds and replaces it.
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(state.wallet().unwrap().total_xmr, 2.5);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}

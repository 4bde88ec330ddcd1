//! Shared market state — the single context object injected into the bus
//! handler, the refresh scheduler, and the compositor.
//!
//! Each part sits behind its own `RwLock`; writers (the ingest worker and
//! the scheduler) hold a lock only for the duration of one mutation, and
//! readers take copies, so the compositor always observes either the state
//! before or fully after a mutation, never a partial one.

use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use mosaic_core::{
    AccountSnapshot, BusEvent, Fragment, PoolStatus, PriceSample, WalletBalance, time_util,
};
use tracing::debug;

use crate::series::PriceSeries;

/// Latest-value store for named fragments.
///
/// `put` replaces unconditionally and records receipt time; `get` never
/// blocks on ingestion for more than a map read and returns `None` for
/// unknown names. Entries live for the process lifetime — a stale fragment
/// is still a fragment.
#[derive(Default)]
pub struct FragmentStore {
    fragments: RwLock<AHashMap<String, Fragment>>,
}

impl FragmentStore {
    pub fn put(&self, name: &str, payload: Vec<u8>) {
        let fragment = Fragment::new(payload, time_util::now_ms());
        let mut map = self.fragments.write().unwrap_or_else(|e| e.into_inner());
        map.insert(name.to_string(), fragment);
    }

    pub fn get(&self, name: &str) -> Option<Fragment> {
        let map = self.fragments.read().unwrap_or_else(|e| e.into_inner());
        map.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.fragments.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All mutable state shared between the event-driven and timer domains.
pub struct MarketState {
    fragments: FragmentStore,
    series: RwLock<PriceSeries>,
    account: RwLock<AccountSnapshot>,
    wallet: RwLock<Option<WalletBalance>>,
    pool: RwLock<Option<PoolStatus>>,
}

impl MarketState {
    pub fn new(series_cap: usize) -> Arc<Self> {
        Arc::new(Self {
            fragments: FragmentStore::default(),
            series: RwLock::new(PriceSeries::new(series_cap)),
            account: RwLock::new(AccountSnapshot::default()),
            wallet: RwLock::new(None),
            pool: RwLock::new(None),
        })
    }

    /// Apply one decoded bus event.
    pub fn apply(&self, event: BusEvent) {
        match event {
            BusEvent::Fragment { name, payload } => {
                debug!("fragment '{name}' updated ({} bytes)", payload.len());
                self.fragments.put(&name, payload);
            }
            BusEvent::Candles(samples) => {
                self.series.write().unwrap_or_else(|e| e.into_inner()).merge(&samples);
            }
            BusEvent::Account(snapshot) => {
                *self.account.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
            }
            BusEvent::Pool(status) => {
                *self.pool.write().unwrap_or_else(|e| e.into_inner()) = Some(status);
            }
        }
    }

    pub fn fragments(&self) -> &FragmentStore {
        &self.fragments
    }

    /// Replace the whole price series from the bulk backfill.
    pub fn seed_series(&self, samples: Vec<PriceSample>) {
        self.series.write().unwrap_or_else(|e| e.into_inner()).seed(samples);
    }

    /// Immutable copy of the current price window.
    pub fn series_snapshot(&self) -> Vec<PriceSample> {
        self.series.read().unwrap_or_else(|e| e.into_inner()).snapshot()
    }

    pub fn account(&self) -> AccountSnapshot {
        *self.account.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a successful wallet poll. Failed polls never call this, so
    /// the last good value survives transient errors.
    pub fn set_wallet(&self, balance: WalletBalance) {
        *self.wallet.write().unwrap_or_else(|e| e.into_inner()) = Some(balance);
    }

    pub fn wallet(&self) -> Option<WalletBalance> {
        *self.wallet.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pool(&self) -> Option<PoolStatus> {
        self.pool.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_put_replaces_and_get_is_total() {
        let store = FragmentStore::default();
        assert!(store.get("vix").is_none());

        store.put("vix", b"one".to_vec());
        store.put("vix", b"two".to_vec());
        assert_eq!(&*store.get("vix").unwrap().payload, b"two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn apply_routes_events() {
        let state = MarketState::new(144);

        state.apply(BusEvent::Fragment { name: "gold".into(), payload: b"png".to_vec() });
        assert!(state.fragments().get("gold").is_some());

        state.apply(BusEvent::Candles(vec![PriceSample::new(100, 1.5)]));
        assert_eq!(state.series_snapshot(), vec![PriceSample::new(100, 1.5)]);

        state.apply(BusEvent::Account(AccountSnapshot {
            equity: Some(10.0),
            unrealized_pnl: None,
        }));
        assert_eq!(state.account().equity, Some(10.0));
        assert_eq!(state.account().unrealized_pnl, None);

        state.apply(BusEvent::Pool(PoolStatus {
            shares: vec![1],
            uncles: vec![],
            payouts: vec![],
        }));
        assert_eq!(state.pool().unwrap().shares, vec![1]);
    }

    #[test]
    fn wallet_is_only_set_on_success() {
        let state = MarketState::new(144);
        assert!(state.wallet().is_none());

        state.set_wallet(WalletBalance { total_xmr: 1.25, unlocked_xmr: 1.0 });
        // A failed poll simply never calls set_wallet — the value stays.
        assert_eq!(state.wallet().unwrap().unlocked_xmr, 1.0);
    }
}

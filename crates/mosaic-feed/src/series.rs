//! Bounded, ordered price series.
//!
//! The series is a sliding window of `(start_time, close)` samples kept
//! sorted by non-decreasing start time with at most one sample per distinct
//! start time. It is seeded once from the bulk backfill and then mutated by
//! streaming merges; because the bus redelivers at least once, the merge
//! rule is idempotent.

use mosaic_core::PriceSample;

/// A bounded price series for one instrument.
///
/// Not internally synchronized — `MarketState` wraps it in a lock, so a
/// `merge` is applied atomically with respect to `snapshot` readers.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
    cap: usize,
}

impl PriceSeries {
    /// Create an empty series retaining at most `cap` samples.
    pub fn new(cap: usize) -> Self {
        Self { samples: Vec::with_capacity(cap), cap }
    }

    /// Replace the whole series with an already-ordered backfill batch,
    /// truncating from the front if it exceeds the cap.
    pub fn seed(&mut self, samples: Vec<PriceSample>) {
        self.samples = samples;
        self.truncate_front();
    }

    /// Merge incremental samples, in the order received.
    ///
    /// Per sample: a start time equal to the last entry's overwrites that
    /// entry's close; a newer start time appends; an older one is dropped —
    /// out-of-order late data is discarded, not inserted in the middle.
    pub fn merge(&mut self, samples: &[PriceSample]) {
        for sample in samples {
            match self.samples.last_mut() {
                Some(last) if last.start_time_ms == sample.start_time_ms => {
                    last.close = sample.close;
                }
                Some(last) if last.start_time_ms < sample.start_time_ms => {
                    self.samples.push(*sample);
                }
                Some(_) => {} // stale, drop
                None => self.samples.push(*sample),
            }
        }
        self.truncate_front();
    }

    /// An immutable copy of the current window for rendering.
    pub fn snapshot(&self) -> Vec<PriceSample> {
        self.samples.clone()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Evict oldest entries until the window fits the cap.
    fn truncate_front(&mut self) {
        if self.samples.len() > self.cap {
            let excess = self.samples.len() - self.cap;
            self.samples.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(t: i64, c: f64) -> PriceSample {
        PriceSample::new(t, c)
    }

    #[test]
    fn merge_scenario() {
        let mut series = PriceSeries::new(144);

        series.merge(&[s(100, 1.0)]);
        assert_eq!(series.snapshot(), vec![s(100, 1.0)]);

        // Same start time updates the close in place.
        series.merge(&[s(100, 2.0)]);
        assert_eq!(series.snapshot(), vec![s(100, 2.0)]);

        // Newer start time appends at the tail.
        series.merge(&[s(110, 3.0)]);
        assert_eq!(series.snapshot(), vec![s(100, 2.0), s(110, 3.0)]);

        // Older start time is stale and dropped.
        series.merge(&[s(90, 9.0)]);
        assert_eq!(series.snapshot(), vec![s(100, 2.0), s(110, 3.0)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut once = PriceSeries::new(144);
        let update = [s(100, 1.0), s(110, 2.0), s(120, 3.0)];
        once.merge(&update);

        let mut twice = PriceSeries::new(144);
        twice.merge(&update);
        twice.merge(&update);

        assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn stays_sorted_and_bounded() {
        let mut series = PriceSeries::new(5);
        for t in [30, 10, 40, 40, 20, 50, 60, 70, 80, 90, 15] {
            series.merge(&[s(t, t as f64)]);
        }
        let snap = series.snapshot();
        assert!(snap.len() <= 5);
        assert!(snap.windows(2).all(|w| w[0].start_time_ms < w[1].start_time_ms));
    }

    #[test]
    fn seed_snapshot_round_trip() {
        let batch: Vec<PriceSample> = (0..144).map(|i| s(i * 600_000, i as f64)).collect();
        let mut series = PriceSeries::new(144);
        series.seed(batch.clone());
        assert_eq!(series.snapshot(), batch);
    }

    #[test]
    fn seed_truncates_oversized_batch_from_front() {
        let batch: Vec<PriceSample> = (0..10).map(|i| s(i, i as f64)).collect();
        let mut series = PriceSeries::new(4);
        series.seed(batch);
        assert_eq!(series.snapshot(), vec![s(6, 6.0), s(7, 7.0), s(8, 8.0), s(9, 9.0)]);
    }

    #[test]
    fn cap_evicts_fifo_on_merge() {
        let mut series = PriceSeries::new(3);
        series.merge(&[s(1, 1.0), s(2, 2.0), s(3, 3.0), s(4, 4.0)]);
        assert_eq!(series.snapshot(), vec![s(2, 2.0), s(3, 3.0), s(4, 4.0)]);
    }
}

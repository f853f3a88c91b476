//! Shared indicator cache.
//!
//! Compute-once, read-many memoization of every derived series the signal
//! generators request. One instance is shared by all workers for the whole
//! multi-strategy run; the underlying price vectors must not change during
//! its lifetime.
//!
//! Locking protocol: look up under the sub-map lock, compute on a miss with
//! the lock released, then re-acquire to publish. Racing misses may duplicate
//! work; outputs are deterministic, so whichever copy lands first wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::PriceSeries;
use crate::indicators;

/// Stable, read-only handle to a cached series.
pub type Series = Arc<Vec<f64>>;

/// Cheap identity fingerprint for a source series: length plus sampled value
/// bits. Distinguishes derived inputs (VIDYA of RSI vs VIDYA of closes) that
/// would otherwise collide on equal parameters.
fn fingerprint(data: &[f64]) -> u64 {
    let n = data.len();
    let mut h = n as u64;
    if n == 0 {
        return h;
    }
    let step = (n / 8).max(1);
    let mut i = 0;
    while i < n {
        h = h.rotate_left(17) ^ data[i].to_bits();
        i += step;
    }
    h.rotate_left(17) ^ data[n - 1].to_bits()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SeriesKey {
    source: u64,
    param: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TrailKey {
    source: u64,
    multiplier_bits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BandKey {
    source: u64,
    length: usize,
    multiplier_bits: u64,
}

/// Thread-safe memo of indicator series, one mutexed sub-map per kind.
#[derive(Debug, Default)]
pub struct IndicatorCache {
    stochastic: Mutex<HashMap<usize, Series>>,
    rsi: Mutex<HashMap<usize, Series>>,
    atr: Mutex<HashMap<usize, Series>>,
    vidya: Mutex<HashMap<SeriesKey, Series>>,
    ott: Mutex<HashMap<TrailKey, Series>>,
    highest: Mutex<HashMap<SeriesKey, Series>>,
    lowest: Mutex<HashMap<SeriesKey, Series>>,
    abs_change: Mutex<HashMap<SeriesKey, Series>>,
    sum_abs_changes: Mutex<HashMap<SeriesKey, Series>>,
    bb_upper: Mutex<HashMap<BandKey, Series>>,
    bb_lower: Mutex<HashMap<BandKey, Series>>,
}

// Every cached value is a completed series, so a map behind a poisoned lock
// is still consistent and can be reused as-is.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn get_or_compute<K, F>(map: &Mutex<HashMap<K, Series>>, key: K, compute: F) -> Series
where
    K: Eq + Hash,
    F: FnOnce() -> Vec<f64>,
{
    if let Some(hit) = lock(map).get(&key) {
        return Arc::clone(hit);
    }
    let computed = Arc::new(compute());
    let mut guard = lock(map);
    Arc::clone(guard.entry(key).or_insert(computed))
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stochastic %K over the price vectors.
    pub fn stochastic(&self, prices: &PriceSeries, k: usize) -> Series {
        get_or_compute(&self.stochastic, k, || {
            indicators::stochastic(&prices.closes, &prices.highs, &prices.lows, k)
        })
    }

    /// Wilder's RSI over the close vector.
    pub fn rsi(&self, prices: &PriceSeries, length: usize) -> Series {
        get_or_compute(&self.rsi, length, || {
            indicators::rsi(&prices.closes, length)
        })
    }

    /// Wilder's ATR over the price vectors.
    pub fn atr(&self, prices: &PriceSeries, period: usize) -> Series {
        get_or_compute(&self.atr, period, || {
            indicators::atr(&prices.highs, &prices.lows, &prices.closes, period)
        })
    }

    /// VIDYA of an arbitrary source series. Reuses the memoized 9-bar change
    /// series for the efficiency ratio.
    pub fn vidya(&self, data: &[f64], length: usize) -> Series {
        let key = SeriesKey {
            source: fingerprint(data),
            param: length,
        };
        if let Some(hit) = lock(&self.vidya).get(&key) {
            return Arc::clone(hit);
        }
        let momentum = self.abs_change(data, 9);
        let volatility = self.sum_abs_changes(data, 9);
        let computed = Arc::new(indicators::vidya_with(data, length, &momentum, &volatility));
        let mut guard = lock(&self.vidya);
        Arc::clone(guard.entry(key).or_insert(computed))
    }

    /// OTT trail of an arbitrary (pre-smoothed) source series.
    pub fn ott(&self, data: &[f64], multiplier: f64) -> Series {
        let key = TrailKey {
            source: fingerprint(data),
            multiplier_bits: multiplier.to_bits(),
        };
        get_or_compute(&self.ott, key, || indicators::ott(data, multiplier))
    }

    /// Rolling maximum over the trailing `period` bars.
    pub fn highest(&self, data: &[f64], period: usize) -> Series {
        let key = SeriesKey {
            source: fingerprint(data),
            param: period,
        };
        get_or_compute(&self.highest, key, || indicators::highest(data, period))
    }

    /// Rolling minimum over the trailing `period` bars.
    pub fn lowest(&self, data: &[f64], period: usize) -> Series {
        let key = SeriesKey {
            source: fingerprint(data),
            param: period,
        };
        get_or_compute(&self.lowest, key, || indicators::lowest(data, period))
    }

    /// `|data[i] - data[i - period]|`.
    pub fn abs_change(&self, data: &[f64], period: usize) -> Series {
        let key = SeriesKey {
            source: fingerprint(data),
            param: period,
        };
        get_or_compute(&self.abs_change, key, || {
            indicators::abs_change(data, period)
        })
    }

    /// Rolling sum of one-bar absolute changes.
    pub fn sum_abs_changes(&self, data: &[f64], period: usize) -> Series {
        let key = SeriesKey {
            source: fingerprint(data),
            param: period,
        };
        get_or_compute(&self.sum_abs_changes, key, || {
            indicators::sum_abs_changes(data, period)
        })
    }

    /// Upper Bollinger band around a VIDYA basis.
    pub fn bb_upper(&self, data: &[f64], length: usize, multiplier: f64) -> Series {
        let key = BandKey {
            source: fingerprint(data),
            length,
            multiplier_bits: multiplier.to_bits(),
        };
        get_or_compute(&self.bb_upper, key, || {
            indicators::bb_upper(data, length, multiplier)
        })
    }

    /// Lower Bollinger band around a VIDYA basis.
    pub fn bb_lower(&self, data: &[f64], length: usize, multiplier: f64) -> Series {
        let key = BandKey {
            source: fingerprint(data),
            length,
            multiplier_bits: multiplier.to_bits(),
        };
        get_or_compute(&self.bb_lower, key, || {
            indicators::bb_lower(data, length, multiplier)
        })
    }

    /// Drop every cached series.
    pub fn clear(&self) {
        lock(&self.stochastic).clear();
        lock(&self.rsi).clear();
        lock(&self.atr).clear();
        lock(&self.vidya).clear();
        lock(&self.ott).clear();
        lock(&self.highest).clear();
        lock(&self.lowest).clear();
        lock(&self.abs_change).clear();
        lock(&self.sum_abs_changes).clear();
        lock(&self.bb_upper).clear();
        lock(&self.bb_lower).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> PriceSeries {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        PriceSeries {
            opens: closes.clone(),
            highs: closes.iter().map(|c| c + 1.0).collect(),
            lows: closes.iter().map(|c| c - 1.0).collect(),
            closes,
        }
    }

    #[test]
    fn cached_equals_direct() {
        let prices = sample_prices();
        let cache = IndicatorCache::new();

        assert_eq!(
            *cache.rsi(&prices, 14),
            indicators::rsi(&prices.closes, 14)
        );
        assert_eq!(
            *cache.vidya(&prices.closes, 10),
            indicators::vidya(&prices.closes, 10)
        );
        let basis = indicators::vidya(&prices.closes, 10);
        assert_eq!(*cache.ott(&basis, 1.5), indicators::ott(&basis, 1.5));
    }

    #[test]
    fn second_lookup_returns_same_allocation() {
        let prices = sample_prices();
        let cache = IndicatorCache::new();

        let first = cache.vidya(&prices.closes, 20);
        let second = cache.vidya(&prices.closes, 20);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn derived_sources_do_not_collide() {
        let prices = sample_prices();
        let cache = IndicatorCache::new();

        let of_closes = cache.vidya(&prices.closes, 10);
        let rsi = cache.rsi(&prices, 10);
        let of_rsi = cache.vidya(&rsi, 10);
        assert_ne!(*of_closes, *of_rsi);
    }

    #[test]
    fn clear_drops_entries() {
        let prices = sample_prices();
        let cache = IndicatorCache::new();

        let before = cache.vidya(&prices.closes, 10);
        cache.clear();
        let after = cache.vidya(&prices.closes, 10);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }
}

//! Grid-search driver: batch evaluation of every parameter combination of a
//! strategy family on the same dataset.
//!
//! Combinations run as independent rayon tasks sharing the indicator cache.
//! Results are filtered, deduplicated on the canonical parameter string, and
//! sorted into a total order, so the output is byte-identical regardless of
//! worker count.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::info;

use crate::backtest::{simulate, TradeRules};
use crate::cache::IndicatorCache;
use crate::core::{PriceSeries, StrategyReport};
use crate::metrics::summarize;
use crate::strategy::{
    BootsParams, ChannelType, CommonParams, FtParams, HottLottParams, MottParams,
    OttChannelParams, OttParams, RisottoParams, RottParams, RtrParams, SottParams,
    StrategyFamily, StrategyParams, TottParams,
};

/// Search-wide knobs: exit grids, entry policy, capital, and result filters.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub sl_percents: Vec<f64>,
    pub tp_percents: Vec<f64>,
    pub use_sl: bool,
    pub use_tp: bool,
    pub pyramiding: bool,
    pub capital: f64,
    pub min_trades: usize,
    pub min_win_rate: f64,
    pub exclude_sl_from_winrate: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            sl_percents: vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
            tp_percents: vec![0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
            use_sl: true,
            use_tp: true,
            pyramiding: false,
            capital: 10_000.0,
            min_trades: 5,
            min_win_rate: 55.0,
            exclude_sl_from_winrate: false,
        }
    }
}

impl SearchSettings {
    fn common_combos(&self) -> Vec<CommonParams> {
        let mut out = Vec::with_capacity(self.sl_percents.len() * self.tp_percents.len());
        for &sl_percent in &self.sl_percents {
            for &tp_percent in &self.tp_percents {
                out.push(CommonParams {
                    sl_percent,
                    tp_percent,
                    use_sl: self.use_sl,
                    use_tp: self.use_tp,
                    pyramiding: self.pyramiding,
                });
            }
        }
        out
    }

    /// The rate the min-win-rate filter applies to.
    pub fn effective_win_rate(&self, report: &StrategyReport) -> f64 {
        if self.exclude_sl_from_winrate {
            report.sl_win_rate
        } else {
            report.win_rate
        }
    }

    pub fn passes(&self, report: &StrategyReport) -> bool {
        report.total_trades >= self.min_trades
            && self.effective_win_rate(report) >= self.min_win_rate
    }
}

/// Enumerate the full parameter grid for one family: the family-specific
/// axes crossed with the SL/TP grids.
pub fn enumerate_params(
    family: StrategyFamily,
    settings: &SearchSettings,
) -> Vec<StrategyParams> {
    let commons = settings.common_combos();
    let mut out = Vec::new();

    match family {
        StrategyFamily::Ott => {
            for &support_length in &[10, 20, 30, 40, 50] {
                for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                    for &common in &commons {
                        out.push(StrategyParams::Ott(OttParams {
                            support_length,
                            ott_multiplier,
                            common,
                        }));
                    }
                }
            }
        }
        StrategyFamily::Tott => {
            for &support_length in &[20, 30, 40, 50] {
                for &ott_multiplier in &[0.3, 0.4, 0.5, 0.6] {
                    for &band_multiplier in &[0.0004, 0.0005, 0.0006] {
                        for &common in &commons {
                            out.push(StrategyParams::Tott(TottParams {
                                support_length,
                                ott_multiplier,
                                band_multiplier,
                                common,
                            }));
                        }
                    }
                }
            }
        }
        StrategyFamily::OttChannel => {
            for &ma_length in &[10, 20, 30, 40, 50] {
                for &ott_multiplier in &[0.3, 0.5, 0.7, 0.9] {
                    for &upper_multiplier in &[0.1, 0.2, 0.3, 0.4, 0.5] {
                        for &lower_multiplier in &[0.1, 0.2, 0.3, 0.4, 0.5] {
                            for &channel_type in &[ChannelType::Half, ChannelType::Full] {
                                for &common in &commons {
                                    out.push(StrategyParams::OttChannel(OttChannelParams {
                                        ma_length,
                                        ott_multiplier,
                                        upper_multiplier,
                                        lower_multiplier,
                                        channel_type,
                                        common,
                                    }));
                                }
                            }
                        }
                    }
                }
            }
        }
        StrategyFamily::Risotto => {
            for &rsi_length in &[8, 12, 16, 20, 24] {
                for &support_length in &[10, 20, 30, 40, 50] {
                    for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                        for &common in &commons {
                            out.push(StrategyParams::Risotto(RisottoParams {
                                rsi_length,
                                support_length,
                                ott_multiplier,
                                common,
                            }));
                        }
                    }
                }
            }
        }
        StrategyFamily::Sott => {
            for &stoch_k_length in &[200, 300, 400, 500] {
                for &stoch_d_length in &[100, 150, 200] {
                    for &ott_multiplier in &[0.5, 0.6, 0.7, 0.8, 0.9, 1.0] {
                        for &common in &commons {
                            out.push(StrategyParams::Sott(SottParams {
                                stoch_k_length,
                                stoch_d_length,
                                ott_multiplier,
                                common,
                            }));
                        }
                    }
                }
            }
        }
        StrategyFamily::HottLott => {
            for &hl_length in &[5, 10, 15, 20, 25, 30] {
                for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                    for &use_sum in &[false, true] {
                        for &sum_n_bars in &[2, 3, 4, 5] {
                            for &common in &commons {
                                out.push(StrategyParams::HottLott(HottLottParams {
                                    hl_length,
                                    ott_multiplier,
                                    use_sum,
                                    sum_n_bars,
                                    common,
                                }));
                            }
                        }
                    }
                }
            }
        }
        StrategyFamily::Rott => {
            for &support_length in &[10, 15, 20, 25, 30, 35, 40, 45, 50] {
                for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                    for &common in &commons {
                        out.push(StrategyParams::Rott(RottParams {
                            support_length,
                            ott_multiplier,
                            common,
                        }));
                    }
                }
            }
        }
        StrategyFamily::Ft => {
            for &support_length in &[10, 20, 30, 40, 50] {
                for &major_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                    for &minor_multiplier in &[0.1, 0.3, 0.5, 0.7, 0.9] {
                        for &common in &commons {
                            out.push(StrategyParams::Ft(FtParams {
                                support_length,
                                major_multiplier,
                                minor_multiplier,
                                common,
                            }));
                        }
                    }
                }
            }
        }
        StrategyFamily::Rtr => {
            for &atr_length in &[5, 10, 15, 20, 25, 30] {
                for &ma_length in &[10, 15, 20, 25, 30, 35, 40, 45, 50] {
                    for &common in &commons {
                        out.push(StrategyParams::Rtr(RtrParams {
                            atr_length,
                            ma_length,
                            common,
                        }));
                    }
                }
            }
        }
        StrategyFamily::Mott => {
            for &support_length in &[10, 20, 30, 40, 50] {
                for &hl_length in &[5, 10, 15, 20, 25, 30] {
                    for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                        for &reference in &[0, 5, 10, 15] {
                            for &common in &commons {
                                out.push(StrategyParams::Mott(MottParams {
                                    support_length,
                                    hl_length,
                                    ott_multiplier,
                                    reference,
                                    common,
                                }));
                            }
                        }
                    }
                }
            }
        }
        StrategyFamily::Boots => {
            for &support_length in &[10, 20, 30, 40, 50] {
                for &bb_length in &[10, 20, 30, 40, 50] {
                    for &ott_multiplier in &[0.5, 0.7, 0.9, 1.1, 1.3, 1.5] {
                        for &common in &commons {
                            out.push(StrategyParams::Boots(BootsParams {
                                support_length,
                                bb_length,
                                ott_multiplier,
                                common,
                            }));
                        }
                    }
                }
            }
        }
    }

    out
}

/// Run one combination: generate the direction sequence, simulate, fold the
/// ledger into a summary.
pub fn run_single(
    params: &StrategyParams,
    prices: &PriceSeries,
    cache: &IndicatorCache,
    settings: &SearchSettings,
) -> StrategyReport {
    let dir = params.generate(prices, cache);
    let common = params.common();
    let rules = TradeRules {
        use_sl: common.use_sl,
        use_tp: common.use_tp,
        sl_percent: common.sl_percent,
        tp_percent: common.tp_percent,
        pyramiding: common.pyramiding,
    };
    let trades = simulate(prices, &dir, &rules);
    summarize(
        params.family().name(),
        params.params_str(),
        trades,
        settings.capital,
    )
}

/// Exhaustively evaluate a family's grid on the worker pool, keeping the
/// combinations that pass the filters, one row per canonical parameter
/// string, ranked by win rate then net profit.
pub fn run_grid_search(
    family: StrategyFamily,
    prices: &PriceSeries,
    cache: &IndicatorCache,
    settings: &SearchSettings,
) -> Vec<StrategyReport> {
    let combos = enumerate_params(family, settings);
    let total = combos.len();
    let report_every = (total / 20).max(1);

    let progress = AtomicUsize::new(0);
    let progress_gate = Mutex::new(());
    let seen: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
    let results: Mutex<Vec<StrategyReport>> = Mutex::new(Vec::new());

    combos.par_iter().for_each(|params| {
        let report = run_single(params, prices, cache, settings);

        if settings.passes(&report) {
            let fresh = lock(&seen).insert(report.params_str.clone());
            if fresh {
                lock(&results).push(report);
            }
        }

        let done = progress.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        if done % report_every == 0 || done == total {
            let _ordered = lock(&progress_gate);
            info!(
                "{}/{} ({:.1}%)",
                done,
                total,
                done as f64 / total as f64 * 100.0
            );
        }
    });

    let mut results = results.into_inner().unwrap_or_else(|e| e.into_inner());
    sort_reports(&mut results);
    results
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Total order on results: win rate desc, net profit desc, canonical string
/// asc. The string tiebreak pins the order of float ties.
pub fn sort_reports(reports: &mut [StrategyReport]) {
    reports.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.net_profit
                    .partial_cmp(&a.net_profit)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.params_str.cmp(&b.params_str))
    });
}

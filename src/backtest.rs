//! Event-driven trade simulator.
//!
//! Assumptions:
//! - Bars are sorted oldest to newest.
//! - `dir[i]` is the strategy's side at bar `i`; a change of side executes
//!   at bar `i + 1`'s open.
//! - Stop-loss/take-profit levels are checked intrabar against the bar's
//!   high/low before the bar's signal transition; stop-loss wins when both
//!   levels sit inside the same bar.

use crate::core::{ExitReason, PriceSeries, Trade};

/// Exit and entry policy for a single simulation run.
#[derive(Debug, Clone, Copy)]
pub struct TradeRules {
    pub use_sl: bool,
    pub use_tp: bool,
    pub sl_percent: f64,
    pub tp_percent: f64,
    pub pyramiding: bool,
}

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    entry_index: usize,
    entry_price: f64,
    is_long: bool,
}

impl OpenPosition {
    fn sl_price(&self, sl_percent: f64) -> f64 {
        if self.is_long {
            self.entry_price * (1.0 - sl_percent / 100.0)
        } else {
            self.entry_price * (1.0 + sl_percent / 100.0)
        }
    }

    fn tp_price(&self, tp_percent: f64) -> f64 {
        if self.is_long {
            self.entry_price * (1.0 + tp_percent / 100.0)
        } else {
            self.entry_price * (1.0 - tp_percent / 100.0)
        }
    }

    fn close(self, exit_index: usize, exit_price: f64, exit_reason: ExitReason) -> Trade {
        let sign = if self.is_long { 1.0 } else { -1.0 };
        Trade {
            entry_index: self.entry_index,
            exit_index,
            entry_price: self.entry_price,
            exit_price,
            profit: (exit_price - self.entry_price) * sign,
            is_long: self.is_long,
            exit_reason,
        }
    }
}

/// Run the direction sequence through the exit/entry state machine and
/// return the closed-trade ledger, ordered by exit time.
///
/// Without pyramiding at most one position is open; with pyramiding every
/// repeated entry signal opens an independent position with its own exits.
pub fn simulate(prices: &PriceSeries, dir: &[i8], rules: &TradeRules) -> Vec<Trade> {
    let n = prices.len();
    assert_eq!(dir.len(), n, "prices/dir length mismatch");
    if n < 2 {
        return Vec::new();
    }

    let mut trades: Vec<Trade> = Vec::new();
    let mut open: Vec<OpenPosition> = Vec::new();
    let mut last_signal = 0i8;

    for i in 1..n {
        // Intrabar exit checks against levels set at entry.
        if !open.is_empty() {
            let mut still_open = Vec::with_capacity(open.len());
            for pos in open.drain(..) {
                let sl = pos.sl_price(rules.sl_percent);
                let tp = pos.tp_price(rules.tp_percent);
                let sl_hit = rules.use_sl
                    && if pos.is_long {
                        prices.lows[i] <= sl
                    } else {
                        prices.highs[i] >= sl
                    };
                let tp_hit = rules.use_tp
                    && if pos.is_long {
                        prices.highs[i] >= tp
                    } else {
                        prices.lows[i] <= tp
                    };

                if sl_hit {
                    trades.push(pos.close(i, sl, ExitReason::StopLoss));
                } else if tp_hit {
                    trades.push(pos.close(i, tp, ExitReason::TakeProfit));
                } else {
                    still_open.push(pos);
                }
            }
            open = still_open;
        }

        // Signal generated on the previous bar executes at this bar's open.
        let signal = dir[i - 1];
        if signal != 0 {
            let want_long = signal > 0;
            let holds_opposite = open.iter().any(|p| p.is_long != want_long);

            if holds_opposite {
                for pos in open.drain(..) {
                    trades.push(pos.close(i, prices.opens[i], ExitReason::Signal));
                }
            }

            // An entry on the final bar would flush at the same index, so
            // the last bar only closes.
            let may_enter = i < n - 1
                && if open.is_empty() && !holds_opposite {
                    rules.pyramiding || signal != last_signal
                } else {
                    holds_opposite || rules.pyramiding
                };
            if may_enter {
                open.push(OpenPosition {
                    entry_index: i,
                    entry_price: prices.opens[i],
                    is_long: want_long,
                });
            }

            last_signal = signal;
        }
    }

    // End-of-series flush.
    for pos in open.drain(..) {
        trades.push(pos.close(n - 1, prices.closes[n - 1], ExitReason::EndOfData));
    }

    trades
}

//! Performance metrics over a closed-trade ledger.
//!
//! Win rate, profit factor, and peak-based max drawdown, folded into the
//! summary record the grid search ranks. Profit is in raw price units; the
//! initial capital only scales the percentage figures.

use crate::core::{ExitReason, StrategyReport, Trade};

/// Winning share of the given trade profits, as a percentage. 0 when empty.
pub fn win_rate(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }
    let wins = pnls.iter().filter(|&&pnl| pnl > 0.0).count();
    wins as f64 / pnls.len() as f64 * 100.0
}

/// Gross profit over gross loss. Infinite when there are gains but no
/// losses; 0 when there is nothing on either side.
pub fn profit_factor(pnls: &[f64]) -> f64 {
    let gross_profit: f64 = pnls.iter().filter(|&&pnl| pnl > 0.0).sum();
    let gross_loss: f64 = pnls.iter().filter(|&&pnl| pnl < 0.0).map(|pnl| -pnl).sum();

    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        gross_profit / gross_loss
    }
}

/// Largest peak-to-trough decline of the running equity curve, as a
/// percentage of the peak. The curve is seeded at `capital`.
pub fn max_drawdown(capital: f64, pnls: &[f64]) -> f64 {
    let mut equity = capital;
    let mut peak = capital;
    let mut max_dd = 0.0_f64;

    for pnl in pnls {
        equity += pnl;
        peak = peak.max(equity);
        if peak > 0.0 {
            max_dd = max_dd.max((peak - equity) / peak * 100.0);
        }
    }

    max_dd
}

/// Fold a trade ledger into the ranked summary record.
pub fn summarize(
    strategy_name: &str,
    params_str: String,
    trades: Vec<Trade>,
    capital: f64,
) -> StrategyReport {
    let pnls: Vec<f64> = trades.iter().map(|t| t.profit).collect();

    let total_trades = trades.len();
    let winning_trades = pnls.iter().filter(|&&p| p > 0.0).count();
    let losing_trades = total_trades - winning_trades;
    let net_profit: f64 = pnls.iter().sum();

    let without_sl: Vec<f64> = trades
        .iter()
        .filter(|t| t.exit_reason != ExitReason::StopLoss)
        .map(|t| t.profit)
        .collect();
    let sl_trades = total_trades - without_sl.len();

    StrategyReport {
        strategy_name: strategy_name.to_string(),
        params_str,
        net_profit,
        profit_factor: profit_factor(&pnls),
        total_trades,
        winning_trades,
        losing_trades,
        win_rate: win_rate(&pnls),
        max_drawdown: max_drawdown(capital, &pnls),
        profit_percent: net_profit / capital * 100.0,
        sl_trades,
        sl_win_rate: win_rate(&without_sl),
        trades,
    }
}

//! Core types shared across the optimizer engine.

use serde::{Deserialize, Serialize};

/// Single OHLCV bar.
/// Assumption: rows are already sorted oldest to newest when loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Price vectors extracted once from the bar series and shared read-only
/// with every worker.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            opens: bars.iter().map(|b| b.open).collect(),
            highs: bars.iter().map(|b| b.high).collect(),
            lows: bars.iter().map(|b| b.low).collect(),
            closes: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Signal,
    StopLoss,
    TakeProfit,
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Signal => "signal",
            ExitReason::StopLoss => "sl",
            ExitReason::TakeProfit => "tp",
            ExitReason::EndOfData => "end_of_data",
        }
    }
}

/// One closed round trip. Profit is the raw price difference, signed by
/// direction; no position sizing is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
    pub is_long: bool,
    pub exit_reason: ExitReason,
}

/// Summary of a single parameter combination, as ranked and written to the
/// result tables. Percentages are in the 0..=100 range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy_name: String,
    pub params_str: String,
    pub net_profit: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub profit_percent: f64,
    pub sl_trades: usize,
    pub sl_win_rate: f64,
    pub trades: Vec<Trade>,
}

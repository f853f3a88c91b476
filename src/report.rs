//! CSV result sink.
//!
//! Writes one directory per strategy under the output root: a ranked
//! `summary.csv` plus a trade ledger per top-ranked combination. The
//! canonical parameter string is embedded in each ledger file name, so a
//! row can be traced back to its exact configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{Bar, StrategyReport};
use crate::strategy::StrategyFamily;

const SUMMARY_COLUMNS: [&str; 11] = [
    "params_str",
    "total_trades",
    "win_rate",
    "sl_win_rate",
    "net_profit",
    "profit_factor",
    "max_drawdown",
    "profit_percent",
    "sl_trades",
    "winning_trades",
    "losing_trades",
];

const TRADE_COLUMNS: [&str; 9] = [
    "entry_index",
    "entry_date",
    "exit_index",
    "exit_date",
    "is_long",
    "entry_price",
    "exit_price",
    "profit",
    "exit_reason",
];

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    params_str: &'a str,
    total_trades: usize,
    win_rate: f64,
    sl_win_rate: f64,
    net_profit: f64,
    profit_factor: f64,
    max_drawdown: f64,
    profit_percent: f64,
    sl_trades: usize,
    winning_trades: usize,
    losing_trades: usize,
}

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    entry_index: usize,
    entry_date: &'a str,
    exit_index: usize,
    exit_date: &'a str,
    is_long: bool,
    entry_price: f64,
    exit_price: f64,
    profit: f64,
    exit_reason: &'a str,
}

/// Result writer rooted at the output directory.
#[derive(Debug, Clone)]
pub struct ReportSink {
    base_dir: PathBuf,
    top_trades: usize,
}

impl ReportSink {
    pub fn new(base_dir: impl Into<PathBuf>, top_trades: usize) -> Self {
        Self {
            base_dir: base_dir.into(),
            top_trades,
        }
    }

    /// Write the ranked summary and the top-N trade ledgers for one family.
    /// An empty result set still produces a header-only summary.
    pub fn write_family(
        &self,
        family: StrategyFamily,
        reports: &[StrategyReport],
        bars: &[Bar],
    ) -> Result<()> {
        let dir = self.base_dir.join(family.name());
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        self.write_summary(&dir, reports)?;
        for (rank, report) in reports.iter().take(self.top_trades).enumerate() {
            self.write_trades(&dir, rank + 1, report, bars)?;
        }
        Ok(())
    }

    fn write_summary(&self, dir: &Path, reports: &[StrategyReport]) -> Result<()> {
        let path = dir.join("summary.csv");
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        writer.write_record(SUMMARY_COLUMNS)?;
        for report in reports {
            writer.serialize(SummaryRow {
                params_str: &report.params_str,
                total_trades: report.total_trades,
                win_rate: report.win_rate,
                sl_win_rate: report.sl_win_rate,
                net_profit: report.net_profit,
                profit_factor: report.profit_factor,
                max_drawdown: report.max_drawdown,
                profit_percent: report.profit_percent,
                sl_trades: report.sl_trades,
                winning_trades: report.winning_trades,
                losing_trades: report.losing_trades,
            })?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))
    }

    fn write_trades(
        &self,
        dir: &Path,
        rank: usize,
        report: &StrategyReport,
        bars: &[Bar],
    ) -> Result<()> {
        let path = dir.join(format!("trades_{rank}_{}.csv", report.params_str));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        writer.write_record(TRADE_COLUMNS)?;
        for trade in &report.trades {
            writer.serialize(TradeRow {
                entry_index: trade.entry_index,
                entry_date: &bars[trade.entry_index].date,
                exit_index: trade.exit_index,
                exit_date: &bars[trade.exit_index].date,
                is_long: trade.is_long,
                entry_price: trade.entry_price,
                exit_price: trade.exit_price,
                profit: trade.profit,
                exit_reason: trade.exit_reason.as_str(),
            })?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExitReason, Trade};

    fn sample_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| Bar {
                date: format!("2024-02-{:02}", i + 1),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1_000.0,
            })
            .collect()
    }

    fn sample_report(params_str: &str) -> StrategyReport {
        StrategyReport {
            strategy_name: "OTT".to_string(),
            params_str: params_str.to_string(),
            net_profit: 12.5,
            profit_factor: 2.5,
            total_trades: 2,
            winning_trades: 1,
            losing_trades: 1,
            win_rate: 50.0,
            max_drawdown: 1.25,
            profit_percent: 0.125,
            sl_trades: 1,
            sl_win_rate: 100.0,
            trades: vec![
                Trade {
                    entry_index: 2,
                    exit_index: 5,
                    entry_price: 100.0,
                    exit_price: 115.0,
                    profit: 15.0,
                    is_long: true,
                    exit_reason: ExitReason::Signal,
                },
                Trade {
                    entry_index: 5,
                    exit_index: 7,
                    entry_price: 115.0,
                    exit_price: 112.5,
                    profit: -2.5,
                    is_long: false,
                    exit_reason: ExitReason::StopLoss,
                },
            ],
        }
    }

    #[test]
    fn summary_and_ledgers_are_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ReportSink::new(dir.path(), 10);
        let bars = sample_bars(10);
        let reports = vec![
            sample_report("Strategy=OTT-SupportLength=10-OTTMultiplier=0.5-SL=1-TP=0.5-Pyramiding=off"),
            sample_report("Strategy=OTT-SupportLength=20-OTTMultiplier=0.5-SL=1-TP=0.5-Pyramiding=off"),
        ];

        sink.write_family(StrategyFamily::Ott, &reports, &bars)
            .expect("write");

        let summary =
            fs::read_to_string(dir.path().join("OTT/summary.csv")).expect("summary");
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], SUMMARY_COLUMNS.join(","));
        assert!(lines[1].starts_with("Strategy=OTT-SupportLength=10"));
        assert!(lines[1].contains(",2,50.0,100.0,12.5,2.5,"));

        let ledger = fs::read_to_string(dir.path().join(
            "OTT/trades_1_Strategy=OTT-SupportLength=10-OTTMultiplier=0.5-SL=1-TP=0.5-Pyramiding=off.csv",
        ))
        .expect("ledger");
        let lines: Vec<&str> = ledger.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TRADE_COLUMNS.join(","));
        assert_eq!(lines[1], "2,2024-02-03,5,2024-02-06,true,100.0,115.0,15.0,signal");
        assert_eq!(lines[2], "5,2024-02-06,7,2024-02-08,false,115.0,112.5,-2.5,sl");
    }

    #[test]
    fn empty_results_leave_a_header_only_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ReportSink::new(dir.path(), 10);

        sink.write_family(StrategyFamily::Rtr, &[], &sample_bars(5))
            .expect("write");

        let summary =
            fs::read_to_string(dir.path().join("RTR/summary.csv")).expect("summary");
        assert_eq!(summary.trim(), SUMMARY_COLUMNS.join(","));
        // No ledgers for an empty table.
        let entries: Vec<_> = fs::read_dir(dir.path().join("RTR"))
            .expect("dir")
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn top_n_limits_ledger_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ReportSink::new(dir.path(), 1);
        let bars = sample_bars(10);
        let reports = vec![sample_report("a"), sample_report("b"), sample_report("c")];

        sink.write_family(StrategyFamily::Ott, &reports, &bars)
            .expect("write");

        assert!(dir.path().join("OTT/trades_1_a.csv").exists());
        assert!(!dir.path().join("OTT/trades_2_b.csv").exists());
    }
}

//! Exhaustive grid-search optimizer for OTT-family trading strategies.
//!
//! Pipeline: bar series -> shared indicator cache -> per-family direction
//! signals -> trade simulation -> ranked, deduplicated result tables. The
//! grid search fans parameter combinations out across a rayon pool; the
//! cache is the only shared mutable state.

pub mod backtest;
pub mod cache;
pub mod core;
pub mod data;
pub mod grid;
pub mod indicators;
pub mod metrics;
pub mod optimizer;
pub mod report;
pub mod strategy;

pub use crate::cache::IndicatorCache;
pub use crate::core::{Bar, ExitReason, PriceSeries, StrategyReport, Trade};
pub use crate::grid::{run_grid_search, SearchSettings};
pub use crate::optimizer::optimize_all;
pub use crate::report::ReportSink;
pub use crate::strategy::{StrategyFamily, StrategyParams};

//! Multi-strategy coordination.
//!
//! Runs the grid-search driver once per selected family over one shared bar
//! series and one shared indicator cache. A family whose search or sink
//! fails is logged and skipped; the remaining families still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::cache::IndicatorCache;
use crate::core::{Bar, PriceSeries};
use crate::grid::{run_grid_search, SearchSettings};
use crate::report::ReportSink;
use crate::strategy::StrategyFamily;

pub fn optimize_all(
    bars: &[Bar],
    families: &[StrategyFamily],
    settings: &SearchSettings,
    sink: &ReportSink,
) {
    let prices = PriceSeries::from_bars(bars);
    let cache = IndicatorCache::new();

    for &family in families {
        let started = Instant::now();
        info!("{}: starting grid search", family);

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            run_grid_search(family, &prices, &cache, settings)
        }));
        let results = match outcome {
            Ok(results) => results,
            Err(_) => {
                error!("{}: worker fault, skipping family", family);
                continue;
            }
        };

        info!(
            "{}: {} combinations kept ({:.1}s)",
            family,
            results.len(),
            started.elapsed().as_secs_f64()
        );
        if results.is_empty() {
            warn!("{}: no combination passed the filters", family);
        }

        if let Err(err) = sink.write_family(family, &results, bars) {
            error!("{}: failed to write results: {err:#}", family);
        }
    }

    cache.clear();
}

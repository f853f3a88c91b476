//! Command-line entry point.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

use ottgrid::grid::SearchSettings;
use ottgrid::optimizer::optimize_all;
use ottgrid::report::ReportSink;
use ottgrid::strategy::StrategyFamily;
use ottgrid::data;

#[derive(Parser, Debug)]
#[command(
    name = "ottgrid",
    about = "Exhaustive grid-search optimizer for OTT-family trading strategies over OHLCV data"
)]
struct Args {
    /// CSV file with date,open,high,low,close,volume rows, oldest first.
    csv_file: PathBuf,

    /// Comma-separated strategy families to optimize.
    /// Available: OTT, TOTT, OTT_CHANNEL, RISOTTO, SOTT, HOTT-LOTT, ROTT, FT, RTR, MOTT, BOOTS.
    #[arg(long, value_delimiter = ',', default_value = "OTT")]
    strategies: Vec<String>,

    /// Worker threads (0 = all hardware threads).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Keep only combinations with at least this many trades.
    #[arg(long = "min-trades", default_value_t = 5)]
    min_trades: usize,

    /// Keep only combinations with at least this win rate (percent).
    #[arg(long = "min-winrate", default_value_t = 55.0)]
    min_winrate: f64,

    /// Disable the stop-loss exit.
    #[arg(long = "no-sl")]
    no_sl: bool,

    /// Disable the take-profit exit.
    #[arg(long = "no-tp")]
    no_tp: bool,

    /// Open an independent position on every repeated entry signal.
    #[arg(long)]
    pyramiding: bool,

    /// Apply the win-rate filter to the rate excluding stop-loss exits.
    #[arg(long = "exclude-sl")]
    exclude_sl: bool,

    /// Root directory for result tables.
    #[arg(long = "output-dir", default_value = "results")]
    output_dir: PathBuf,

    /// Number of top-ranked combinations to write trade ledgers for.
    #[arg(long = "top-trades", default_value_t = 10)]
    top_trades: usize,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut families: Vec<StrategyFamily> = Vec::new();
    for name in &args.strategies {
        let family: StrategyFamily = name
            .parse()
            .map_err(|msg: String| anyhow::anyhow!(msg))?;
        if !families.contains(&family) {
            families.push(family);
        }
    }

    info!("loading {}", args.csv_file.display());
    let bars = data::load_csv(&args.csv_file)?;
    info!(
        "loaded {} bars from {} to {}",
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date
    );

    let settings = SearchSettings {
        use_sl: !args.no_sl,
        use_tp: !args.no_tp,
        pyramiding: args.pyramiding,
        min_trades: args.min_trades,
        min_win_rate: args.min_winrate,
        exclude_sl_from_winrate: args.exclude_sl,
        ..SearchSettings::default()
    };
    let sink = ReportSink::new(&args.output_dir, args.top_trades);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .context("failed to build worker pool")?;
    let total_combos: usize = families
        .iter()
        .map(|&f| ottgrid::grid::enumerate_params(f, &settings).len())
        .sum();
    info!(
        "optimizing {} strategies, {} combinations on {} threads",
        families.len(),
        total_combos,
        pool.current_num_threads()
    );

    pool.install(|| optimize_all(&bars, &families, &settings, &sink));

    info!("results written under {}", args.output_dir.display());
    Ok(())
}

//! Bar-series loading.
//!
//! Reads the `date,open,high,low,close,volume` CSV contract with an explicit
//! schema, so a malformed numeric cell fails the load instead of silently
//! becoming a null. Rows must already be ordered oldest to newest.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use polars::prelude::*;
use thiserror::Error;

use crate::core::Bar;

/// Fewer bars than this cannot outlive the indicator warm-up windows.
pub const MIN_BARS: usize = 50;

/// Errors from the input layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] PolarsError),

    #[error("malformed value in column '{column}' at row {row}")]
    MalformedValue { column: &'static str, row: usize },

    #[error("{count} bars is below the minimum of {min}")]
    TooFewBars { count: usize, min: usize },
}

fn bar_schema() -> Schema {
    Schema::from_iter([
        Field::new("date", DataType::String),
        Field::new("open", DataType::Float64),
        Field::new("high", DataType::Float64),
        Field::new("low", DataType::Float64),
        Field::new("close", DataType::Float64),
        Field::new("volume", DataType::Float64),
    ])
}

/// Load a bar series from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_schema(Some(Arc::new(bar_schema())))
        .finish()?
        .collect()?;

    let bars = df_to_bars(&df)?;
    if bars.len() < MIN_BARS {
        return Err(LoadError::TooFewBars {
            count: bars.len(),
            min: MIN_BARS,
        });
    }
    Ok(bars)
}

fn df_to_bars(df: &DataFrame) -> Result<Vec<Bar>, LoadError> {
    let dates = df.column("date")?.str()?;
    let opens = df.column("open")?.f64()?;
    let highs = df.column("high")?.f64()?;
    let lows = df.column("low")?.f64()?;
    let closes = df.column("close")?.f64()?;
    let volumes = df.column("volume")?.f64()?;

    let cell = |column: &'static str, row: usize| LoadError::MalformedValue { column, row };

    let n = df.height();
    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        bars.push(Bar {
            date: dates.get(i).ok_or_else(|| cell("date", i))?.to_string(),
            open: opens.get(i).ok_or_else(|| cell("open", i))?,
            high: highs.get(i).ok_or_else(|| cell("high", i))?,
            low: lows.get(i).ok_or_else(|| cell("low", i))?,
            close: closes.get(i).ok_or_else(|| cell("close", i))?,
            volume: volumes.get(i).ok_or_else(|| cell("volume", i))?,
        });
    }

    Ok(bars)
}

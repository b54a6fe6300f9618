//! Feature preparation for points regression.
//!
//! Season tables arrive with every statistic as text or as whatever the CSV
//! reader inferred. [`prepare`] turns one into a numeric feature matrix and
//! target:
//!
//! 1. coerce the feature and target columns to Float64 (text becomes null)
//! 2. drop rows with a null in any of them
//! 3. derive `FGA_per_MP`
//! 4. keep rows passing the [`PlaytimeFilter`]

use crate::config::PlaytimeFilter;
use crate::error::{Result, ResultExt};
use crate::utils::{numeric, read_csv, require_columns};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Box-score columns used as model inputs, in matrix order.
pub const FEATURE_COLUMNS: [&str; 12] = [
    "G", "MP", "FGA", "3PA", "FTA", "AST", "TRB", "STL", "BLK", "FG%", "3P%", "FT%",
];

/// Column the models predict.
pub const TARGET_COLUMN: &str = "PTS";

/// Field-goal attempts per minute played.
pub const DERIVED_FEATURE: &str = "FGA_per_MP";

/// Output of [`prepare`].
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Model inputs: [`FEATURE_COLUMNS`] then [`DERIVED_FEATURE`], all Float64.
    pub features: DataFrame,
    /// Float64 [`TARGET_COLUMN`], row-aligned with `features`.
    pub target: Series,
    /// Every original column of the surviving rows, numeric columns coerced.
    pub table: DataFrame,
}

impl PreparedData {
    /// Names of the feature columns, in matrix order.
    pub fn feature_names(&self) -> Vec<String> {
        self.features
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.features.height()
    }
}

/// Load a season or combined table from CSV.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let df = read_csv(path).context("Loading dataset")?;
    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

/// Build the feature matrix and target with the default playtime filter.
pub fn prepare(df: &DataFrame) -> Result<PreparedData> {
    prepare_with(df, &PlaytimeFilter::default())
}

/// Build the feature matrix and target with explicit playtime thresholds.
///
/// Only a missing required column is an error; unusable values drop their row.
pub fn prepare_with(df: &DataFrame, filter: &PlaytimeFilter) -> Result<PreparedData> {
    let mut required: Vec<&str> = FEATURE_COLUMNS.to_vec();
    required.push(TARGET_COLUMN);
    require_columns(df, &required)?;

    let rows_before = df.height();
    let coerced: Vec<Expr> = required.iter().map(|name| numeric(name)).collect();
    let complete = required
        .iter()
        .map(|name| col(*name).is_not_null())
        .reduce(|acc, expr| acc.and(expr))
        .unwrap_or(lit(true));

    let table = df
        .clone()
        .lazy()
        .with_columns(coerced)
        .filter(complete)
        .with_column((col("FGA") / col("MP")).alias(DERIVED_FEATURE))
        .filter(playtime_predicate(filter))
        .collect()
        .context("Preparing features")?;

    let mut feature_names: Vec<&str> = FEATURE_COLUMNS.to_vec();
    feature_names.push(DERIVED_FEATURE);
    let features = table.select(feature_names)?;
    let target = table.column(TARGET_COLUMN)?.as_materialized_series().clone();

    debug!(
        "Prepared {} of {} rows ({} features)",
        table.height(),
        rows_before,
        features.width()
    );

    Ok(PreparedData {
        features,
        target,
        table,
    })
}

/// Keep rows whose numeric `MP >= min_minutes` and `G >= min_games`.
///
/// Values that are not numbers never pass. Other columns are returned as they
/// came in, so filtering twice gives the same table.
pub fn apply_min_playtime_filter(df: &DataFrame, min_minutes: f64, min_games: f64) -> Result<DataFrame> {
    require_columns(df, &["MP", "G"])?;
    let filter = PlaytimeFilter::new(min_minutes, min_games);
    let out = df
        .clone()
        .lazy()
        .filter(playtime_predicate(&filter))
        .collect()?;
    debug!(
        "Playtime filter (MP >= {}, G >= {}): {} -> {} rows",
        min_minutes,
        min_games,
        df.height(),
        out.height()
    );
    Ok(out)
}

fn playtime_predicate(filter: &PlaytimeFilter) -> Expr {
    numeric("MP")
        .gt_eq(lit(filter.min_minutes))
        .and(numeric("G").gt_eq(lit(filter.min_games)))
        .fill_null(lit(false))
}

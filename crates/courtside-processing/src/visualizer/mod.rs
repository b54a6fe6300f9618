//! Ranked per-player bar charts.
//!
//! [`rank`] orders players by a raw or derived metric; [`rank_and_plot`]
//! renders one ranking as a PNG named after the chart title. Two fixed chart
//! sets are provided:
//!
//! - [`plot_extended`] - efficiency charts drawn by the pipeline on the
//!   playtime-filtered table
//! - [`plot_leaders`] - raw season leaders for a single season file

mod font;
mod render;

pub use render::render_bar_chart;

use crate::collector::PLAYER_COLUMN;
use crate::error::{ProcessingError, Result};
use crate::utils::{has_columns, numeric, ratio, require_columns, slugify};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of players per chart.
pub const DEFAULT_TOP_N: usize = 10;

const VALUE: &str = "value";

/// Quantity a chart ranks players by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// A table column, coerced to a number.
    Column(String),
    /// `numerator / denominator`; undefined when the denominator is not positive.
    Ratio {
        numerator: String,
        denominator: String,
    },
}

impl Metric {
    /// Columns the metric is computed from.
    pub fn source_columns(&self) -> Vec<&str> {
        match self {
            Self::Column(name) => vec![name.as_str()],
            Self::Ratio {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
        }
    }

    fn expr(&self) -> Expr {
        match self {
            Self::Column(name) => numeric(name),
            Self::Ratio {
                numerator,
                denominator,
            } => ratio(numerator, denominator),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Column(name) => name.clone(),
            Self::Ratio {
                numerator,
                denominator,
            } => format!("{numerator} / {denominator}"),
        }
    }
}

/// One chart: its title and the metric it ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub metric: Metric,
}

impl ChartSpec {
    pub fn column(title: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metric: Metric::Column(column.into()),
        }
    }

    pub fn ratio(
        title: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            metric: Metric::Ratio {
                numerator: numerator.into(),
                denominator: denominator.into(),
            },
        }
    }

    /// Output file name: the title lowercased with spaces as underscores.
    pub fn file_name(&self) -> String {
        format!("{}.png", slugify(&self.title))
    }
}

/// A player and the value they were ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub player: String,
    pub value: f64,
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartImage {
    pub title: String,
    pub metric: String,
    pub path: PathBuf,
    pub entries: Vec<RankedEntry>,
}

/// Efficiency charts drawn by the pipeline.
pub fn extended_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec::column("Top 10 Field Goal Percentage", "FG%"),
        ChartSpec::ratio("Top 10 Points Per Minute", "PTS", "MP"),
        ChartSpec::ratio("Top 10 Assists Per Game", "AST", "G"),
        ChartSpec::ratio("Top 10 Rebounds Per Game", "TRB", "G"),
    ]
}

/// Raw season leader charts.
pub fn leader_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec::column("Top 10 Scorers", "PTS"),
        ChartSpec::column("Top 10 3-Point Shooters", "3P"),
        ChartSpec::column("Top 10 Assist Leaders", "AST"),
        ChartSpec::column("Top 10 Minutes Played", "MP"),
    ]
}

/// The `top_n` players by `metric`, highest first.
///
/// Rows whose metric is missing or not a number are ignored. Ties keep table
/// order.
pub fn rank(df: &DataFrame, metric: &Metric, top_n: usize) -> Result<Vec<RankedEntry>> {
    let mut required = metric.source_columns();
    required.push(PLAYER_COLUMN);
    require_columns(df, &required)?;

    let ranked = df
        .clone()
        .lazy()
        .select([
            col(PLAYER_COLUMN).cast(DataType::String),
            metric.expr().alias(VALUE),
        ])
        .filter(col(VALUE).is_not_null().and(col(VALUE).is_not_nan()))
        .sort(
            [VALUE],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(top_n as IdxSize)
        .collect()?;

    let players = ranked.column(PLAYER_COLUMN)?.str()?;
    let values = ranked.column(VALUE)?.f64()?;

    Ok(players
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(player, value)| {
            Some(RankedEntry {
                player: player.unwrap_or_default().to_string(),
                value: value?,
            })
        })
        .collect())
}

/// Rank players for `spec` and save the chart under `out_dir`.
pub fn rank_and_plot(df: &DataFrame, spec: &ChartSpec, top_n: usize, out_dir: &Path) -> Result<ChartImage> {
    let entries = rank(df, &spec.metric, top_n)?;
    if entries.is_empty() {
        return Err(ProcessingError::NoRankableValues {
            title: spec.title.clone(),
            metric: spec.metric.describe(),
        });
    }

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(spec.file_name());
    render_bar_chart(&entries, &spec.title, &spec.metric.describe(), &path)?;
    info!("Chart saved: {}", path.display());

    Ok(ChartImage {
        title: spec.title.clone(),
        metric: spec.metric.describe(),
        path,
        entries,
    })
}

/// Render every chart in `specs` whose source columns are present.
///
/// Charts with a missing source column are skipped without error; a chart
/// with no numeric values is skipped with a warning.
pub fn plot_charts(df: &DataFrame, specs: &[ChartSpec], top_n: usize, out_dir: &Path) -> Result<Vec<ChartImage>> {
    let mut images = Vec::with_capacity(specs.len());
    for spec in specs {
        let mut needed = spec.metric.source_columns();
        needed.push(PLAYER_COLUMN);
        if !has_columns(df, &needed) {
            debug!("Skipping '{}': source column missing", spec.title);
            continue;
        }

        match rank_and_plot(df, spec, top_n, out_dir) {
            Ok(image) => images.push(image),
            Err(e @ ProcessingError::NoRankableValues { .. }) => {
                warn!("Skipping chart: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(images)
}

/// The pipeline's efficiency charts for a filtered table.
pub fn plot_extended(df: &DataFrame, out_dir: &Path) -> Result<Vec<ChartImage>> {
    plot_charts(df, &extended_charts(), DEFAULT_TOP_N, out_dir)
}

/// Season leader charts for a single season table.
pub fn plot_leaders(df: &DataFrame, out_dir: &Path) -> Result<Vec<ChartImage>> {
    plot_charts(df, &leader_charts(), DEFAULT_TOP_N, out_dir)
}

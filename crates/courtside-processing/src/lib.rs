//! Season Totals Processing Library
//!
//! Collects basketball season totals, prepares them for regression, and turns
//! them into charts and a PDF report. Built on Polars.
//!
//! # Overview
//!
//! - **Collection**: fetch a season page, parse its totals table, resolve
//!   multi-team duplicates, store per-season and combined CSV files
//! - **Feature Preparation**: numeric coercion, incomplete-row removal, the
//!   `FGA_per_MP` ratio, minimum playtime filtering
//! - **Visualization**: ranked top-N bar charts by raw or derived metrics
//! - **Reporting**: chart images concatenated into a PDF, one per page
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use courtside_processing::{CollectorConfig, SeasonCollector, features, visualizer};
//! use std::path::Path;
//!
//! // Scrape 2020-2025 into ./data
//! let summary = SeasonCollector::http(CollectorConfig::default())?.collect_range(2020, 2025)?;
//!
//! // Prepare the combined table for modeling
//! let df = features::load_dataset(summary.combined_path.as_deref().unwrap())?;
//! let prepared = features::prepare(&df)?;
//! println!("{} rows, {:?}", prepared.height(), prepared.feature_names());
//!
//! // Charts on the filtered table
//! let filtered = features::apply_min_playtime_filter(&df, 100.0, 10.0)?;
//! visualizer::plot_extended(&filtered, Path::new("data/plots"))?;
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod features;
pub mod reporting;
pub mod utils;
pub mod visualizer;

// Re-exports for convenient access
pub use collector::{
    CollectionSummary, HttpSeasonSource, RawTable, SeasonCollector, SeasonFile, SeasonSource,
    SkippedSeason, deduplicate, fetch, parse,
};
pub use config::{CollectorConfig, CollectorConfigBuilder, ConfigValidationError, PlaytimeFilter};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use features::{
    DERIVED_FEATURE, FEATURE_COLUMNS, PreparedData, TARGET_COLUMN, apply_min_playtime_filter,
    load_dataset, prepare, prepare_with,
};
pub use reporting::{ReportOutcome, build_report};
pub use visualizer::{
    ChartImage, ChartSpec, Metric, RankedEntry, plot_extended, plot_leaders, rank, rank_and_plot,
};

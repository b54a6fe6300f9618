//! Season totals collection.
//!
//! The collector fetches one season page at a time, parses its statistics
//! table, resolves multi-team duplicates and writes:
//!
//! - `nba_{year}_totals_raw.csv` - the parsed table as published
//! - `nba_{year}_totals_cleaned.csv` - after [`deduplicate`]
//! - `nba_combined_totals_cleaned.csv` - every collected season stacked
//!
//! A season that fails (network, missing table, empty table, write error)
//! is logged and skipped; the rest of the range still runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use courtside_processing::{CollectorConfig, SeasonCollector};
//!
//! let collector = SeasonCollector::http(CollectorConfig::default())?;
//! let summary = collector.collect_range(2020, 2025)?;
//! println!("collected {:?}, skipped {}", summary.seasons(), summary.skipped.len());
//! ```

mod dedupe;
mod parse;
mod source;

pub use dedupe::{deduplicate, is_multi_team_marker, team_column};
pub use parse::{PLAYER_COLUMN, SEASON_COLUMN, parse};
pub use source::{HttpSeasonSource, RawTable, SeasonSource, extract_table, fetch};

use crate::config::CollectorConfig;
use crate::error::{ProcessingError, Result, ResultExt};
use crate::utils::write_csv;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the stacked multi-season table.
pub const COMBINED_FILE_NAME: &str = "nba_combined_totals_cleaned.csv";

/// File name of one season's table as published.
pub fn raw_file_name(season: u16) -> String {
    format!("nba_{season}_totals_raw.csv")
}

/// File name of one season's deduplicated table.
pub fn cleaned_file_name(season: u16) -> String {
    format!("nba_{season}_totals_cleaned.csv")
}

/// Files written for one collected season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonFile {
    pub season: u16,
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    /// Rows after deduplication.
    pub rows: usize,
}

/// A season left out of the collection, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSeason {
    pub season: u16,
    pub reason: String,
    /// The source page failed (status, transport, missing table), not local work.
    pub remote: bool,
}

/// Outcome of [`SeasonCollector::collect_range`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub collected: Vec<SeasonFile>,
    pub skipped: Vec<SkippedSeason>,
    /// `None` when no season could be collected.
    pub combined_path: Option<PathBuf>,
    pub combined_rows: usize,
}

impl CollectionSummary {
    /// Years that were collected, in order.
    pub fn seasons(&self) -> Vec<u16> {
        self.collected.iter().map(|file| file.season).collect()
    }
}

/// Fetches, parses, deduplicates and stores season tables.
pub struct SeasonCollector {
    source: Box<dyn SeasonSource>,
    output_dir: PathBuf,
}

static_assertions::assert_impl_all!(SeasonCollector: Send, Sync);

impl SeasonCollector {
    /// Collector reading from any [`SeasonSource`].
    pub fn new(source: Box<dyn SeasonSource>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    /// Collector fetching season pages over HTTP.
    pub fn http(config: CollectorConfig) -> Result<Self> {
        let output_dir = config.output_dir.clone();
        Ok(Self::new(Box::new(HttpSeasonSource::new(config)?), output_dir))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Collect one season and write its raw and cleaned files.
    ///
    /// Returns the written files and the cleaned table.
    pub fn collect_season(&self, season: u16) -> Result<(SeasonFile, DataFrame)> {
        let raw = self.source.fetch(season)?;
        let mut table = parse(&raw)?;

        let raw_path = self.output_dir.join(raw_file_name(season));
        write_csv(&mut table, &raw_path)?;

        let mut cleaned = deduplicate(&table).context(format!("Season {season}"))?;
        let cleaned_path = self.output_dir.join(cleaned_file_name(season));
        write_csv(&mut cleaned, &cleaned_path)?;

        info!(
            "Season {}: {} rows ({} after deduplication) -> {}",
            season,
            table.height(),
            cleaned.height(),
            cleaned_path.display()
        );

        let file = SeasonFile {
            season,
            raw_path,
            cleaned_path,
            rows: cleaned.height(),
        };
        Ok((file, cleaned))
    }

    /// Collect every season from `start_year` to `end_year` inclusive.
    ///
    /// Failed seasons are logged and listed in [`CollectionSummary::skipped`].
    /// The combined file is written only when at least one season succeeded.
    pub fn collect_range(&self, start_year: u16, end_year: u16) -> Result<CollectionSummary> {
        if start_year > end_year {
            return Err(ProcessingError::InvalidConfig(format!(
                "start year {start_year} is after end year {end_year}"
            )));
        }

        info!("Collecting seasons {}-{}", start_year, end_year);
        let mut summary = CollectionSummary::default();
        let mut frames: Vec<LazyFrame> = Vec::new();

        for season in start_year..=end_year {
            match self.collect_season(season) {
                Ok((file, cleaned)) => {
                    summary.collected.push(file);
                    frames.push(cleaned.lazy());
                }
                Err(e) => {
                    let remote = e.is_remote();
                    if remote {
                        warn!("Skipping season {}: source unavailable: {}", season, e);
                    } else {
                        warn!("Skipping season {}: {}", season, e);
                    }
                    summary.skipped.push(SkippedSeason {
                        season,
                        reason: e.to_string(),
                        remote,
                    });
                }
            }
        }

        if frames.is_empty() {
            warn!(
                "No season in {}-{} could be collected; combined file not written",
                start_year, end_year
            );
            return Ok(summary);
        }

        // Seasons may differ in columns (e.g. Tm vs Team); missing ones become null.
        let mut combined = concat_lf_diagonal(frames, UnionArgs::default())?.collect()?;
        let combined_path = self.output_dir.join(COMBINED_FILE_NAME);
        write_csv(&mut combined, &combined_path)?;
        info!(
            "Combined {} seasons ({} rows) -> {}",
            summary.collected.len(),
            combined.height(),
            combined_path.display()
        );

        summary.combined_rows = combined.height();
        summary.combined_path = Some(combined_path);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::read_csv;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Serves canned table HTML per season; other seasons answer 404.
    struct FixtureSource {
        tables: HashMap<u16, String>,
    }

    impl SeasonSource for FixtureSource {
        fn fetch(&self, season: u16) -> Result<RawTable> {
            let url = format!("fixture://{season}");
            match self.tables.get(&season) {
                Some(html) => Ok(RawTable {
                    season,
                    url,
                    html: html.clone(),
                }),
                None => Err(ProcessingError::HttpStatus { status: 404, url }),
            }
        }
    }

    fn season_html(team_header: &str, rows: &[(&str, &str, &str)]) -> String {
        let body: String = rows
            .iter()
            .enumerate()
            .map(|(i, (player, team, pts))| {
                format!("<tr><th>{}</th><td>{player}</td><td>{team}</td><td>{pts}</td></tr>", i + 1)
            })
            .collect();
        format!(
            "<table id=\"totals_stats\"><thead><tr><th>Rk</th><th>Player</th><th>{team_header}</th><th>PTS</th></tr></thead>\
             <tbody>{body}<tr><th></th><td>League Average</td><td></td><td>500</td></tr></tbody></table>"
        )
    }

    fn collector(dir: &Path) -> SeasonCollector {
        let tables = HashMap::from([
            (
                2023,
                season_html(
                    "Tm",
                    &[("Old Timer", "TOT", "900"), ("Old Timer", "SEA", "400"), ("Old Timer", "CHI", "500")],
                ),
            ),
            (
                2024,
                season_html(
                    "Team",
                    &[("Traded Wing", "LAL", "300"), ("Traded Wing", "2TM", "700"), ("Home Guard", "BOS", "900")],
                ),
            ),
        ]);
        SeasonCollector::new(Box::new(FixtureSource { tables }), dir)
    }

    #[test]
    fn test_collect_season_writes_raw_and_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let (file, cleaned) = collector(dir.path()).collect_season(2024).unwrap();

        assert_eq!(file.rows, 2);
        assert_eq!(cleaned.height(), 2);
        assert_eq!(read_csv(&file.raw_path).unwrap().height(), 3);
        assert_eq!(read_csv(&file.cleaned_path).unwrap().height(), 2);
        assert!(file.cleaned_path.ends_with("nba_2024_totals_cleaned.csv"));
    }

    #[test]
    fn test_collect_range_skips_failed_seasons() {
        let dir = tempfile::tempdir().unwrap();
        let summary = collector(dir.path()).collect_range(2022, 2024).unwrap();

        assert_eq!(summary.seasons(), vec![2023, 2024]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].season, 2022);
        assert!(summary.skipped[0].reason.contains("404"));
        assert!(summary.skipped[0].remote);
    }

    #[test]
    fn test_collect_range_marks_local_failures() {
        let dir = tempfile::tempdir().unwrap();
        let tables = HashMap::from([
            (2024, season_html("Team", &[("Home Guard", "BOS", "900")])),
            (2025, season_html("Team", &[])),
        ]);
        let collector = SeasonCollector::new(Box::new(FixtureSource { tables }), dir.path());

        let summary = collector.collect_range(2024, 2025).unwrap();

        assert_eq!(summary.seasons(), vec![2024]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].season, 2025);
        assert!(!summary.skipped[0].remote);
    }

    #[test]
    fn test_collect_range_combines_with_mismatched_team_columns() {
        let dir = tempfile::tempdir().unwrap();
        let summary = collector(dir.path()).collect_range(2023, 2024).unwrap();

        let combined_path = summary.combined_path.expect("combined file written");
        let combined = read_csv(&combined_path).unwrap();
        assert_eq!(combined.height(), 3);
        assert_eq!(summary.combined_rows, 3);
        assert!(combined.column("Tm").is_ok());
        assert!(combined.column("Team").is_ok());

        let seasons: Vec<Option<i64>> = combined
            .column("Season")
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(seasons, vec![Some(2023), Some(2024), Some(2024)]);
    }

    #[test]
    fn test_collect_range_nothing_collected() {
        let dir = tempfile::tempdir().unwrap();
        let summary = collector(dir.path()).collect_range(2030, 2031).unwrap();

        assert!(summary.collected.is_empty());
        assert_eq!(summary.skipped.len(), 2);
        assert!(summary.combined_path.is_none());
        assert!(!dir.path().join(COMBINED_FILE_NAME).exists());
    }

    #[test]
    fn test_collect_range_rejects_reversed_years() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collector(dir.path()).collect_range(2025, 2020),
            Err(ProcessingError::InvalidConfig(_))
        ));
    }
}

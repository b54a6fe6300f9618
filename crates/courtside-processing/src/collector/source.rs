//! Season page retrieval.
//!
//! [`SeasonSource`] is the seam between the collector and wherever season
//! pages come from. [`HttpSeasonSource`] performs a single blocking GET per
//! season with an explicit timeout; there is no retry.

use crate::config::CollectorConfig;
use crate::error::{ProcessingError, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// The statistics `<table>` of one season page, still as HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Season end year (2024 is the 2023-24 season).
    pub season: u16,
    /// Page the table was taken from.
    pub url: String,
    /// Outer HTML of the located table element.
    pub html: String,
}

/// Anything that can produce the statistics table for a season.
pub trait SeasonSource: Send + Sync {
    /// Retrieve the statistics table for `season`.
    ///
    /// Fails when the page cannot be retrieved or has no statistics table.
    fn fetch(&self, season: u16) -> Result<RawTable>;
}

/// Season pages fetched over HTTP.
pub struct HttpSeasonSource {
    client: reqwest::blocking::Client,
    config: CollectorConfig,
}

static_assertions::assert_impl_all!(HttpSeasonSource: Send, Sync);

impl HttpSeasonSource {
    pub fn new(config: CollectorConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

impl SeasonSource for HttpSeasonSource {
    fn fetch(&self, season: u16) -> Result<RawTable> {
        let url = self.config.season_url(season);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProcessingError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text()?;
        extract_table(&body, &self.config.table_id, season, &url)
    }
}

/// Fetch one season's statistics table with a one-off HTTP source.
pub fn fetch(config: &CollectorConfig, season: u16) -> Result<RawTable> {
    HttpSeasonSource::new(config.clone())?.fetch(season)
}

/// Locate `table#<table_id>` in a full HTML document.
pub fn extract_table(document: &str, table_id: &str, season: u16, url: &str) -> Result<RawTable> {
    let selector = Selector::parse(&format!("table#{table_id}")).map_err(|e| {
        ProcessingError::InvalidConfig(format!("table id '{table_id}' is not a valid selector: {e:?}"))
    })?;

    let document = Html::parse_document(document);
    let table = document
        .select(&selector)
        .next()
        .ok_or_else(|| ProcessingError::TableNotFound {
            table_id: table_id.to_string(),
            url: url.to_string(),
        })?;

    Ok(RawTable {
        season,
        url: url.to_string(),
        html: table.html(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table id="per_game_stats"><tr><td>wrong table</td></tr></table>
          <table id="totals_stats" class="stats_table">
            <thead><tr><th>Rk</th><th>Player</th></tr></thead>
            <tbody><tr><th>1</th><td>A</td></tr></tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_table_by_id() {
        let raw = extract_table(PAGE, "totals_stats", 2024, "http://localhost/2024").unwrap();
        assert_eq!(raw.season, 2024);
        assert!(raw.html.starts_with("<table"));
        assert!(raw.html.contains("totals_stats"));
        assert!(!raw.html.contains("wrong table"));
    }

    #[test]
    fn test_extract_table_missing() {
        let err = extract_table(PAGE, "advanced_stats", 2024, "http://localhost/2024").unwrap_err();
        assert_eq!(err.error_code(), "TABLE_NOT_FOUND");
        assert!(err.to_string().contains("advanced_stats"));
    }

    #[test]
    fn test_http_source_rejects_bad_config() {
        let config = CollectorConfig {
            url_template: "http://localhost/no-placeholder".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(
            HttpSeasonSource::new(config),
            Err(ProcessingError::InvalidConfig(_))
        ));
    }

    #[test]
    #[ignore = "Requires network access to basketball-reference.com"]
    fn test_fetch_live_season() {
        let raw = fetch(&CollectorConfig::default(), 2024).unwrap();
        assert!(raw.html.contains("Player"));
    }
}

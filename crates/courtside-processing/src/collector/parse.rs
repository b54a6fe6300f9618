//! Season table parsing.

use crate::collector::source::RawTable;
use crate::error::{ProcessingError, Result};
use once_cell::sync::Lazy;
use polars::prelude::*;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Column appended by [`parse`] holding the season end year.
pub const SEASON_COLUMN: &str = "Season";

/// Identity column of every season table.
pub const PLAYER_COLUMN: &str = "Player";

/// Prefix of the synthetic aggregate row at the bottom of a season table.
const LEAGUE_AVERAGE: &str = "League Average";

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static HEADER_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("thead tr").expect("valid selector"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid selector"));
static BODY_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").expect("valid selector"));
static BODY_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("valid selector"));

/// Parse a season table into one string-typed record per player-team row.
///
/// Header names come from the last header row. Repeated in-body header rows
/// (class `thead` or a rank cell reading `Rk`) are skipped, as are rows whose
/// cell count does not match the header. The trailing "League Average" row is
/// dropped and a [`SEASON_COLUMN`] is appended.
pub fn parse(raw: &RawTable) -> Result<DataFrame> {
    let fragment = Html::parse_fragment(&raw.html);
    let table = fragment
        .select(&TABLE)
        .next()
        .ok_or(ProcessingError::EmptyTable(raw.season))?;

    let headers = table
        .select(&HEADER_ROW)
        .last()
        .map(|row| row.select(&HEADER_CELL).map(cell_text).collect::<Vec<_>>())
        .filter(|headers| !headers.is_empty())
        .ok_or(ProcessingError::EmptyTable(raw.season))?;
    let headers = unique_headers(headers);

    let rank_idx = headers.iter().position(|h| h == "Rk");
    let player_idx = headers.iter().position(|h| h == PLAYER_COLUMN);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in table.select(&BODY_ROW) {
        if row.value().classes().any(|class| class == "thead") {
            continue;
        }

        let cells: Vec<String> = row.select(&BODY_CELL).map(cell_text).collect();
        if rank_idx.is_some_and(|idx| cells.get(idx).is_some_and(|c| c == "Rk")) {
            continue;
        }
        if cells.len() != headers.len() {
            debug!(
                "Season {}: skipping row with {} cells (expected {})",
                raw.season,
                cells.len(),
                headers.len()
            );
            continue;
        }
        rows.push(cells);
    }

    if let Some(idx) = player_idx {
        if rows.last().is_some_and(|row| row[idx].starts_with(LEAGUE_AVERAGE)) {
            rows.pop();
        }
    }

    if rows.is_empty() {
        return Err(ProcessingError::EmptyTable(raw.season));
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    columns.push(Column::new(
        SEASON_COLUMN.into(),
        vec![i32::from(raw.season); rows.len()],
    ));

    let df = DataFrame::new(columns)?;
    debug!("Season {}: parsed {} rows x {} columns", raw.season, df.height(), df.width());
    Ok(df)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Make header names unique and non-empty; [`SEASON_COLUMN`] is reserved.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::from([SEASON_COLUMN.to_string()]);
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("column_{idx}")
            } else {
                header
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(html: &str) -> RawTable {
        RawTable {
            season: 2024,
            url: "http://localhost/2024".to_string(),
            html: html.to_string(),
        }
    }

    const TABLE_HTML: &str = r#"
        <table id="totals_stats">
          <thead><tr><th>Rk</th><th>Player</th><th>Team</th><th>PTS</th></tr></thead>
          <tbody>
            <tr><th>1</th><td><a href="/p/a">Alpha Guard</a></td><td>BOS</td><td>1500</td></tr>
            <tr class="thead"><th>Rk</th><th>Player</th><th>Team</th><th>PTS</th></tr>
            <tr><th>Rk</th><td>Player</td><td>Team</td><td>PTS</td></tr>
            <tr><th>2</th><td> Beta Center </td><td>2TM</td><td>900</td></tr>
            <tr><th>3</th><td>Short Row</td></tr>
            <tr><th></th><td>League Average</td><td></td><td>400</td></tr>
          </tbody>
        </table>
    "#;

    #[test]
    fn test_parse_rows_and_headers() {
        let df = parse(&raw(TABLE_HTML)).unwrap();

        assert_eq!(
            df.get_column_names_str(),
            vec!["Rk", "Player", "Team", "PTS", "Season"]
        );
        assert_eq!(df.height(), 2);

        let players: Vec<Option<&str>> = df.column("Player").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(players, vec![Some("Alpha Guard"), Some("Beta Center")]);
    }

    #[test]
    fn test_parse_appends_season() {
        let df = parse(&raw(TABLE_HTML)).unwrap();
        let seasons: Vec<Option<i32>> = df.column("Season").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(seasons, vec![Some(2024), Some(2024)]);
    }

    #[test]
    fn test_parse_drops_league_average_only_at_end() {
        let df = parse(&raw(TABLE_HTML)).unwrap();
        let players: Vec<Option<&str>> = df.column("Player").unwrap().str().unwrap().into_iter().collect();
        assert!(!players.contains(&Some("League Average")));
    }

    #[test]
    fn test_parse_without_body_rows() {
        let html = "<table><thead><tr><th>Rk</th><th>Player</th></tr></thead><tbody></tbody></table>";
        let err = parse(&raw(html)).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyTable(2024)));
    }

    #[test]
    fn test_parse_without_header() {
        let html = "<table><tbody><tr><td>x</td></tr></tbody></table>";
        assert!(parse(&raw(html)).is_err());
    }

    #[test]
    fn test_unique_headers() {
        let headers = vec![
            "Rk".to_string(),
            String::new(),
            "Rk".to_string(),
            "Season".to_string(),
        ];
        assert_eq!(
            unique_headers(headers),
            vec!["Rk", "column_1", "Rk_2", "Season_2"]
        );
    }
}

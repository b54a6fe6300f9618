//! Multi-team duplicate resolution.
//!
//! A player traded mid-season appears once per team plus once on an
//! aggregate row whose team cell is a multi-team marker. Current pages write
//! the marker as `2TM`, `3TM`, ...; older pages used `TOT`. The marker format
//! belongs to the source site and is not under our control: if it changes,
//! traded players silently keep all their rows.

use crate::collector::parse::PLAYER_COLUMN;
use crate::error::{ProcessingError, Result};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static MULTI_TEAM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+TM|TOT)$").expect("valid multi-team marker pattern"));

/// True when a team value marks a player's aggregate row across teams.
pub fn is_multi_team_marker(team: &str) -> bool {
    MULTI_TEAM_MARKER.is_match(team.trim())
}

/// Name of the team column: `Team`, or `Tm` on older pages.
pub fn team_column(df: &DataFrame) -> Result<&'static str> {
    ["Team", "Tm"]
        .into_iter()
        .find(|name| df.column(name).is_ok())
        .ok_or_else(|| ProcessingError::ColumnNotFound("Team".to_string()))
}

/// Keep only the aggregate row of every multi-team player.
///
/// For a player with a marker row, the first such row is kept and every other
/// row for that player is dropped. Players without a marker row are left
/// untouched. Row order is preserved.
pub fn deduplicate(df: &DataFrame) -> Result<DataFrame> {
    let team_name = team_column(df)?;
    let players = df
        .column(PLAYER_COLUMN)
        .map_err(|_| ProcessingError::ColumnNotFound(PLAYER_COLUMN.to_string()))?
        .cast(&DataType::String)?;
    let teams = df.column(team_name)?.cast(&DataType::String)?;
    let players = players.str()?;
    let teams = teams.str()?;

    let mut marker_rows: HashMap<&str, usize> = HashMap::new();
    for (idx, (player, team)) in players.into_iter().zip(teams.into_iter()).enumerate() {
        if let (Some(player), Some(team)) = (player, team) {
            if is_multi_team_marker(team) {
                marker_rows.entry(player).or_insert(idx);
            }
        }
    }

    let keep: Vec<bool> = players
        .into_iter()
        .enumerate()
        .map(|(idx, player)| match player.and_then(|p| marker_rows.get(p)) {
            Some(&marker_idx) => marker_idx == idx,
            None => true,
        })
        .collect();

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let deduped = df.filter(&mask)?;
    debug!(
        "Deduplicated {} multi-team players: {} -> {} rows",
        marker_rows.len(),
        df.height(),
        deduped.height()
    );
    Ok(deduped)
}

//! Shared helpers for CSV I/O, column checks and file naming.

use crate::error::{ProcessingError, Result, ResultExt};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

// =============================================================================
// Naming
// =============================================================================

/// File-name stem for a chart title or model name: lowercase, spaces become `_`.
///
/// # Examples
///
/// ```
/// use courtside_processing::utils::slugify;
///
/// assert_eq!(slugify("Top 10 Points Per Minute"), "top_10_points_per_minute");
/// assert_eq!(slugify("RandomForest"), "randomforest");
/// ```
pub fn slugify(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

// =============================================================================
// Column helpers
// =============================================================================

/// Fail with [`ProcessingError::ColumnNotFound`] for the first absent column.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        if df.column(name).is_err() {
            return Err(ProcessingError::ColumnNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// True when every named column exists.
pub fn has_columns(df: &DataFrame, columns: &[&str]) -> bool {
    columns.iter().all(|name| df.column(name).is_ok())
}

/// Column coerced to Float64; values that are not numbers become null.
#[inline]
pub fn numeric(name: &str) -> Expr {
    col(name).cast(DataType::Float64)
}

/// `numerator / denominator` as Float64, null when the denominator is not positive.
pub fn ratio(numerator: &str, denominator: &str) -> Expr {
    when(numeric(denominator).gt(lit(0.0)))
        .then(numeric(numerator) / numeric(denominator))
        .otherwise(lit(NULL).cast(DataType::Float64))
}

// =============================================================================
// CSV I/O
// =============================================================================

/// Read a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading {}", path.display()))
}

/// Write a DataFrame as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }
    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .context(format!("Writing {}", path.display()))?;
    Ok(())
}

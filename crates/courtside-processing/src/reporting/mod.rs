//! PDF report assembly.
//!
//! Collects the chart images of a directory and lays them out one per A4 page.

mod assembler;

pub use assembler::{ReportOutcome, build_report, list_images};

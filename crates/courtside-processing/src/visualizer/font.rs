//! Embedded chart font.
//!
//! Charts render text with plotters' `ab_glyph` backend, which only knows
//! fonts registered at runtime. DejaVu Sans is compiled in and registered as
//! `sans-serif` so chart text never depends on the host's font setup.

use crate::error::{ProcessingError, Result};
use once_cell::sync::Lazy;
use plotters::style::{FontStyle, register_font};

/// Family name the chart code asks for.
pub const FONT_FAMILY: &str = "sans-serif";

static FONT_BYTES: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/fonts/DejaVuSans.ttf"));

static REGISTERED: Lazy<std::result::Result<(), String>> = Lazy::new(|| {
    register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).map_err(|_| "invalid font data".to_string())
});

/// Register the embedded font once per process.
pub fn ensure_font(title: &str) -> Result<()> {
    REGISTERED.clone().map_err(|reason| ProcessingError::Plot {
        title: title.to_string(),
        reason: format!("loading embedded font: {reason}"),
    })
}

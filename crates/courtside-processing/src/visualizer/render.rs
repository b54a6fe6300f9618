//! Horizontal ranked bar charts.

use crate::error::{ProcessingError, Result};
use crate::visualizer::RankedEntry;
use crate::visualizer::font::{FONT_FAMILY, ensure_font};
use plotters::prelude::*;
use std::path::Path;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Draw `entries` as horizontal bars, first entry at the top, into a PNG.
pub fn render_bar_chart(entries: &[RankedEntry], title: &str, x_label: &str, path: &Path) -> Result<()> {
    if entries.is_empty() {
        return Err(ProcessingError::Plot {
            title: title.to_string(),
            reason: "nothing to draw".to_string(),
        });
    }
    ensure_font(title)?;

    draw(entries, title, x_label, path).map_err(|e| ProcessingError::Plot {
        title: title.to_string(),
        reason: e.to_string(),
    })
}

fn draw(
    entries: &[RankedEntry],
    title: &str,
    x_label: &str,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let rows = entries.len() as i32;
    let (x_min, x_max) = value_range(entries);
    // segment 0 is the bottom row
    let labels: Vec<&str> = entries.iter().rev().map(|e| e.player.as_str()).collect();

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 26))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(190)
        .build_cartesian_2d(x_min..x_max, (0..rows).into_segmented())?;

    let label_for = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(row) => labels
            .get(*row as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(entries.len())
        .y_label_formatter(&label_for)
        .x_desc(x_label)
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(idx, entry)| {
        let row = rows - 1 - idx as i32;
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(row)),
                (entry.value, SegmentValue::Exact(row + 1)),
            ],
            BAR_COLOR.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()?;
    Ok(())
}

/// Horizontal axis range: always includes zero, padded past the longest bar.
fn value_range(entries: &[RankedEntry]) -> (f64, f64) {
    let max = entries.iter().map(|e| e.value).fold(0.0_f64, f64::max);
    let min = entries.iter().map(|e| e.value).fold(0.0_f64, f64::min);
    let max = if max > 0.0 { max * 1.1 } else { 1.0 };
    (min * 1.1, max)
}

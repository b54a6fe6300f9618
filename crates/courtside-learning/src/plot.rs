//! Predicted-vs-actual scatter plots.

use crate::error::{LearningError, Result};
use ndarray::ArrayView1;
use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::path::Path;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const FONT_FAMILY: &str = "sans-serif";

// ab_glyph renders only registered fonts; DejaVu Sans ships with the crate.
static FONT_BYTES: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/fonts/DejaVuSans.ttf"));

static FONT_REGISTERED: Lazy<std::result::Result<(), String>> = Lazy::new(|| {
    register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).map_err(|_| "invalid font data".to_string())
});

/// Scatter of `actual` (x) against `predicted` (y) with a dashed red
/// `y = x` reference line, saved as PNG.
pub fn render_scatter(
    model_name: &str,
    target_label: &str,
    actual: ArrayView1<f64>,
    predicted: ArrayView1<f64>,
    path: &Path,
) -> Result<()> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(LearningError::Plot(format!(
            "{model_name}: {} actual values and {} predictions",
            actual.len(),
            predicted.len()
        )));
    }
    FONT_REGISTERED
        .clone()
        .map_err(|reason| LearningError::Plot(format!("loading embedded font: {reason}")))?;

    draw(model_name, target_label, actual, predicted, path)
        .map_err(|e| LearningError::Plot(format!("{model_name}: {e}")))
}

fn draw(
    model_name: &str,
    target_label: &str,
    actual: ArrayView1<f64>,
    predicted: ArrayView1<f64>,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (lo, hi) = axis_range(actual, predicted);
    let (line_lo, line_hi) = (
        actual.iter().copied().fold(f64::INFINITY, f64::min),
        actual.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    );

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{model_name}: Predicted vs Actual {target_label}"),
            (FONT_FAMILY, 24),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc(format!("Actual {target_label}"))
        .y_desc(format!("Predicted {target_label}"))
        .light_line_style(BLACK.mix(0.06))
        .draw()?;

    chart
        .draw_series(
            actual
                .iter()
                .zip(predicted.iter())
                .map(|(&a, &p)| Circle::new((a, p), 3, POINT_COLOR.mix(0.6).filled())),
        )?
        .label("Test rows")
        .legend(|(x, y)| Circle::new((x, y), 3, POINT_COLOR.filled()));

    chart
        .draw_series(DashedLineSeries::new(
            vec![(line_lo, line_lo), (line_hi, line_hi)],
            8,
            5,
            RED.stroke_width(2),
        ))?
        .label("Ideal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Shared range for both axes so the reference line is the diagonal.
fn axis_range(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> (f64, f64) {
    let (lo, hi) = actual
        .iter()
        .chain(predicted.iter())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_axis_range_covers_both_series() {
        let (lo, hi) = axis_range(array![10.0, 50.0].view(), array![0.0, 100.0].view());
        assert!(lo < 0.0);
        assert!(hi > 100.0);
    }

    #[test]
    fn test_axis_range_single_value() {
        let (lo, hi) = axis_range(array![5.0].view(), array![5.0].view());
        assert_eq!((lo, hi), (4.0, 6.0));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_scatter(
            "LinearRegression",
            "PTS",
            array![1.0, 2.0].view(),
            array![1.0].view(),
            &dir.path().join("x.png"),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "PLOT_FAILED");
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linearregression_predicted_vs_actual.png");
        render_scatter("LinearRegression", "PTS", array![1.0, 2.0, 3.0].view(), array![1.1, 1.9, 3.2].view(), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

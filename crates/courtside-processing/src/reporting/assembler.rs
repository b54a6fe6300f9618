use crate::error::{ProcessingError, Result, ResultExt};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// A4 portrait, image placed 10 mm from the left and top edges, 190 mm wide.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const IMAGE_WIDTH_MM: f32 = 190.0;
const MAX_IMAGE_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
const MM_PER_INCH: f32 = 25.4;

/// Result of [`build_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The PDF was written with one page per image, in `pages` order.
    Written { path: PathBuf, pages: Vec<PathBuf> },
    /// No matching image was found; nothing was written.
    Skipped { image_dir: PathBuf },
}

impl ReportOutcome {
    pub fn page_count(&self) -> usize {
        match self {
            Self::Written { pages, .. } => pages.len(),
            Self::Skipped { .. } => 0,
        }
    }
}

/// PNG files in `image_dir`, optionally only those whose name contains
/// `name_filter`, in lexical order.
pub fn list_images(image_dir: &Path, name_filter: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(image_dir).context(format!("Listing {}", image_dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        let matches_filter = match name_filter {
            Some(filter) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(filter)),
            None => true,
        };
        if is_png && matches_filter {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Concatenate the PNG images of `image_dir` into a PDF, one per A4 page.
///
/// With no matching image a warning is logged, nothing is written and
/// [`ReportOutcome::Skipped`] is returned.
pub fn build_report(image_dir: &Path, output_path: &Path, name_filter: Option<&str>) -> Result<ReportOutcome> {
    let images = list_images(image_dir, name_filter)?;
    if images.is_empty() {
        warn!(
            "No PNG images in {}{}; report not written",
            image_dir.display(),
            name_filter
                .map(|f| format!(" matching '{f}'"))
                .unwrap_or_default()
        );
        return Ok(ReportOutcome::Skipped {
            image_dir: image_dir.to_path_buf(),
        });
    }

    let title = output_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("report");
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    for (idx, image_path) in images.iter().enumerate() {
        let (page, layer) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);

        let image = load_png(image_path)?;
        let transform = placement(image.image.width.0, image.image.height.0);
        image.add_to_layer(layer, transform);
        debug!("Page {}: {}", idx + 1, image_path.display());
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output_path)?);
    doc.save(&mut writer)
        .map_err(|e| ProcessingError::Report(format!("writing {}: {e}", output_path.display())))?;

    info!("Report with {} pages saved: {}", images.len(), output_path.display());
    Ok(ReportOutcome::Written {
        path: output_path.to_path_buf(),
        pages: images,
    })
}

fn load_png(path: &Path) -> Result<Image> {
    let reader = BufReader::new(File::open(path).context(format!("Opening {}", path.display()))?);
    let decoder = PngDecoder::new(reader)
        .map_err(|e| ProcessingError::Report(format!("decoding {}: {e}", path.display())))?;
    Image::try_from(decoder)
        .map_err(|e| ProcessingError::Report(format!("embedding {}: {e}", path.display())))
}

/// Scale an image to the content width (or height, for tall images) keeping
/// its aspect ratio, anchored at the top-left margin.
fn placement(width_px: usize, height_px: usize) -> ImageTransform {
    let width_px = width_px.max(1) as f32;
    let height_px = height_px.max(1) as f32;

    let mut dpi = width_px * MM_PER_INCH / IMAGE_WIDTH_MM;
    let mut height_mm = height_px * MM_PER_INCH / dpi;
    if height_mm > MAX_IMAGE_HEIGHT_MM {
        dpi = height_px * MM_PER_INCH / MAX_IMAGE_HEIGHT_MM;
        height_mm = MAX_IMAGE_HEIGHT_MM;
    }

    ImageTransform {
        translate_x: Some(Mm(MARGIN_MM)),
        translate_y: Some(Mm(PAGE_HEIGHT_MM - MARGIN_MM - height_mm)),
        dpi: Some(dpi),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_full_width() {
        let transform = placement(1900, 1000);
        // 1900 px across 190 mm
        assert!((transform.dpi.unwrap() - 254.0).abs() < 1e-3);
        assert!((transform.translate_x.unwrap().0 - 10.0).abs() < 1e-6);
        let y = transform.translate_y.unwrap().0;
        assert!((y - (297.0 - 10.0 - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_placement_tall_image_fits_page() {
        let transform = placement(100, 10_000);
        let y = transform.translate_y.unwrap().0;
        assert!((y - MARGIN_MM).abs() < 1e-3);
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_chart.png", "a_chart.PNG", "notes.txt", "c_model.png"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let all = list_images(dir.path(), None).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a_chart.PNG", "b_chart.png", "c_model.png"]);

        let charts = list_images(dir.path(), Some("chart")).unwrap();
        assert_eq!(charts.len(), 2);
    }

    #[test]
    fn test_build_report_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/report.pdf");

        let outcome = build_report(dir.path(), &output, None).unwrap();

        assert!(matches!(outcome, ReportOutcome::Skipped { .. }));
        assert_eq!(outcome.page_count(), 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_build_report_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_report(&dir.path().join("absent"), &dir.path().join("r.pdf"), None).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}

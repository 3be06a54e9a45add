//! Application Coordinator
//!
//! Runs one screenshot through detection, annotation and persistence.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::OutputSettings;
use crate::overlay::{AnnotationEngine, LabelMap};
use crate::storage;
use crate::vision::TextDetector;

/// Outcome of annotating one screenshot
#[derive(Debug)]
pub struct AnnotationReport {
    /// Label assignments
    pub labels: LabelMap,
    /// Where the annotated image was written
    pub output_path: PathBuf,
}

/// Detect text on `image_path`, draw badges and save the annotated copy
///
/// A detector failure is returned before the screenshot is opened.
pub fn run_annotation(
    detector: &dyn TextDetector,
    engine: &AnnotationEngine,
    image_path: &Path,
    output: &OutputSettings,
) -> Result<AnnotationReport> {
    let regions = match detector.detect(image_path) {
        Ok(regions) => regions,
        Err(e) => {
            error!("OCR failed to annotate screenshot: {}", e);
            return Err(e).context("Text detection failed");
        }
    };
    info!("OCR detected {} regions", regions.len());

    let screenshot = storage::load_screenshot(image_path)?;
    let annotation = engine.annotate(screenshot, &regions);
    debug!(
        "Assigned labels: {:?}",
        annotation.labels.labels().collect::<Vec<_>>()
    );

    let output_path = storage::annotated_output_path(image_path, output)?;
    storage::save_annotated(&annotation.image, &output_path)?;

    info!("{} elements found on the screen", annotation.labels.len());
    info!("Annotated screenshot saved to {:?}", output_path);

    Ok(AnnotationReport {
        labels: annotation.labels,
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::badge::test_font;
    use crate::overlay::widgets::BadgeStyle;
    use crate::overlay::BadgeRenderer;
    use crate::vision::ocr::OcrError;
    use crate::vision::RawRegion;
    use image::{Rgb, RgbImage};
    use std::cell::Cell;
    use tempfile::TempDir;

    struct StubDetector {
        regions: Vec<RawRegion>,
        calls: Cell<usize>,
    }

    impl TextDetector for StubDetector {
        fn detect(&self, _image_path: &Path) -> Result<Vec<RawRegion>, OcrError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl TextDetector for FailingDetector {
        fn detect(&self, _image_path: &Path) -> Result<Vec<RawRegion>, OcrError> {
            Err(OcrError::Service {
                code: 17,
                message: "Open api daily request limit reached".to_string(),
            })
        }
    }

    fn engine() -> Option<AnnotationEngine> {
        test_font().map(|font| AnnotationEngine::new(BadgeRenderer::new(BadgeStyle::default(), font)))
    }

    #[test]
    fn test_run_annotation_writes_output() {
        let Some(engine) = engine() else {
            eprintln!("no bold font installed, skipping");
            return;
        };

        let dir = TempDir::new().unwrap();
        let input = dir.path().join("screen.png");
        RgbImage::from_pixel(400, 300, Rgb([255, 255, 255]))
            .save(&input)
            .unwrap();

        let detector = StubDetector {
            regions: vec![
                RawRegion::new("File", [(80, 40)]),
                RawRegion::new("Edit", [(120, 45)]),
                RawRegion::new("View", [(200, 40)]),
            ],
            calls: Cell::new(0),
        };
        let output = OutputSettings {
            directory: Some(dir.path().join("out")),
            ..Default::default()
        };

        let report = run_annotation(&detector, &engine, &input, &output).unwrap();

        assert_eq!(detector.calls.get(), 1);
        assert_eq!(report.labels.labels().collect::<Vec<_>>(), vec!["A1", "A2"]);
        assert_eq!(report.labels.get("A2").unwrap().text, "View");
        assert_eq!(report.output_path, dir.path().join("out").join("annotated_screen.png"));

        let saved = image::open(&report.output_path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (400, 300));
        assert_ne!(*saved.get_pixel(70, 30), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_detector_failure_skips_annotation() {
        let Some(engine) = engine() else {
            return;
        };

        let dir = TempDir::new().unwrap();
        // The screenshot does not exist; a detector failure must be reported first
        let input = dir.path().join("missing.png");
        let output = OutputSettings {
            directory: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let err = run_annotation(&FailingDetector, &engine, &input, &output).unwrap_err();
        assert!(err.downcast_ref::<OcrError>().is_some());
        assert!(!dir.path().join("annotated_missing.png").exists());
    }
}

//! Album assembly: every input photo through locate → crop → compose, then onto pages.
//!
//! [`AlbumBuilder::build`] is the one entry point. It rejects a bad
//! configuration or an empty input before touching any pixels, then runs the
//! per-photo chain in parallel and hands the survivors, in input order, to
//! [`layout`](crate::layout::layout).
//!
//! ## Partial failure
//!
//! A photo that cannot be decoded is skipped and recorded in
//! [`AlbumReport::skipped`]; it does not leave a gap on the page. A detector
//! error is not a skip: the crop centers on the image and the reason lands in
//! [`AlbumReport::fallbacks`].
//!
//! ## Parallel Processing
//!
//! Photos are processed with [rayon](https://docs.rs/rayon) on the global
//! pool (see `processing.max_processes`). The indexed collect keeps input
//! order regardless of which worker finishes first.
//!
//! ## Cancellation
//!
//! An optional shared flag is checked before each photo starts. Once set,
//! photos not yet started are counted in [`AlbumReport::cancelled`]; a photo
//! already in progress always finishes.

use crate::config::{AlbumConfig, ConfigError};
use crate::imaging::{
    ComposedPhoto, FaceDetector, FaceLocator, ImageComposer, LabelFont, LabelStyle, SourceFile,
    SourceImage, plan_crop,
};
use crate::layout::{LayoutError, Page, PageGeometry, Placement, layout};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("No images to build an album from")]
    NoImages,
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
}

/// Progress events emitted while building.
///
/// Sent through an optional channel so the caller can print progress as
/// photos complete. `index` is the 1-based position in the input.
#[derive(Debug, Clone, PartialEq)]
pub enum AlbumEvent {
    Started {
        image_count: usize,
    },
    ImageComposed {
        index: usize,
        filename: String,
        faces: usize,
        /// Set when detection failed and the crop fell back to the center.
        fallback: Option<String>,
    },
    ImageSkipped {
        index: usize,
        filename: String,
        reason: String,
    },
}

/// A photo left out of the album.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedImage {
    pub filename: String,
    pub reason: String,
}

/// A photo whose crop was centered because detection failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionFallback {
    pub filename: String,
    pub reason: String,
}

/// Everything a build produced.
#[derive(Debug)]
pub struct AlbumReport {
    pub pages: Vec<Page<ComposedPhoto>>,
    /// Geometry the pages were laid out with; the PDF writer needs it.
    pub geometry: PageGeometry,
    pub skipped: Vec<SkippedImage>,
    pub fallbacks: Vec<DetectionFallback>,
    /// Photos never started because the build was cancelled.
    pub cancelled: usize,
}

impl AlbumReport {
    pub fn photo_count(&self) -> usize {
        self.pages.iter().map(|p| p.slots.len()).sum()
    }

    /// Pixel-free view of the report, for `--report` JSON.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            page_count: self.pages.len(),
            photo_count: self.photo_count(),
            pages: self
                .pages
                .iter()
                .map(|page| PageSummary {
                    number: page.number,
                    photos: page
                        .slots
                        .iter()
                        .map(|slot| PlacedPhoto {
                            filename: slot.item.filename.clone(),
                            width_px: slot.item.width,
                            height_px: slot.item.height,
                            placement: slot.placement,
                        })
                        .collect(),
                })
                .collect(),
            skipped: self.skipped.clone(),
            fallbacks: self.fallbacks.clone(),
            cancelled: self.cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub page_count: usize,
    pub photo_count: usize,
    pub pages: Vec<PageSummary>,
    pub skipped: Vec<SkippedImage>,
    pub fallbacks: Vec<DetectionFallback>,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub number: usize,
    pub photos: Vec<PlacedPhoto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedPhoto {
    pub filename: String,
    pub width_px: u32,
    pub height_px: u32,
    pub placement: Placement,
}

/// Outcome of one photo's chain.
enum Outcome {
    Composed {
        photo: ComposedPhoto,
        faces: usize,
        fallback: Option<DetectionFallback>,
    },
    Skipped(SkippedImage),
    Cancelled,
}

/// Builds an album from source files.
pub struct AlbumBuilder {
    config: AlbumConfig,
    detector: Arc<dyn FaceDetector>,
    events: Option<Sender<AlbumEvent>>,
    cancel: Option<Arc<AtomicBool>>,
}

impl AlbumBuilder {
    pub fn new(config: AlbumConfig, detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            config,
            detector,
            events: None,
            cancel: None,
        }
    }

    /// Send progress events to `tx`. The channel closes when the builder drops.
    pub fn with_events(mut self, tx: Sender<AlbumEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Stop starting new photos once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn build(&self, files: &[SourceFile]) -> Result<AlbumReport, AlbumError> {
        self.config.validate()?;
        if files.is_empty() {
            return Err(AlbumError::NoImages);
        }

        let font = if self.config.label.enabled {
            LabelFont::resolve(self.config.label.font_path.as_deref())
        } else {
            None
        };
        if let Some(font) = &font {
            log::info!("Labeling photos with {}", font.source().display());
        }
        let label = font.as_ref().map(|font| LabelStyle {
            font,
            px: self.config.label_px(),
        });
        let composer = ImageComposer::new(self.config.target_pixels(), label);
        let locator = FaceLocator::new(self.detector.as_ref(), self.config.detector_params());
        let target_ratio = self.config.target_ratio();

        self.emit(AlbumEvent::Started {
            image_count: files.len(),
        });

        let outcomes: Vec<Outcome> = files
            .par_iter()
            .enumerate()
            .map(|(i, file)| {
                if self.is_cancelled() {
                    return Outcome::Cancelled;
                }
                let outcome = compose_one(file, &locator, &composer, target_ratio);
                self.emit_outcome(i + 1, &outcome);
                outcome
            })
            .collect();

        let mut photos = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        let mut fallbacks = Vec::new();
        let mut cancelled = 0;
        for outcome in outcomes {
            match outcome {
                Outcome::Composed {
                    photo, fallback, ..
                } => {
                    photos.push(photo);
                    fallbacks.extend(fallback);
                }
                Outcome::Skipped(skip) => skipped.push(skip),
                Outcome::Cancelled => cancelled += 1,
            }
        }

        let geometry = self.config.geometry();
        let pages = layout(photos, &geometry)?;
        Ok(AlbumReport {
            pages,
            geometry,
            skipped,
            fallbacks,
            cancelled,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn emit(&self, event: AlbumEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            tx.send(event).ok();
        }
    }

    fn emit_outcome(&self, index: usize, outcome: &Outcome) {
        let event = match outcome {
            Outcome::Composed {
                photo,
                faces,
                fallback,
            } => AlbumEvent::ImageComposed {
                index,
                filename: photo.filename.clone(),
                faces: *faces,
                fallback: fallback.as_ref().map(|f| f.reason.clone()),
            },
            Outcome::Skipped(skip) => AlbumEvent::ImageSkipped {
                index,
                filename: skip.filename.clone(),
                reason: skip.reason.clone(),
            },
            Outcome::Cancelled => return,
        };
        self.emit(event);
    }
}

/// Decode, locate, crop and compose one photo.
fn compose_one(
    file: &SourceFile,
    locator: &FaceLocator<'_>,
    composer: &ImageComposer<'_>,
    target_ratio: f64,
) -> Outcome {
    let source = match SourceImage::decode(file) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Skipping {}: {}", file.filename, e);
            return Outcome::Skipped(SkippedImage {
                filename: file.filename.clone(),
                reason: e.to_string(),
            });
        }
    };

    let located = locator.locate(&source);
    let crop = plan_crop(source.width, source.height, located.focal, target_ratio);
    let photo = composer.compose(&source, &crop, label_text(&source.filename));
    log::debug!(
        "{}: {} face(s), crop {:?}",
        source.filename,
        located.faces.len(),
        crop
    );

    Outcome::Composed {
        photo,
        faces: located.faces.len(),
        fallback: located.fallback.map(|reason| DetectionFallback {
            filename: source.filename.clone(),
            reason,
        }),
    }
}

/// Printed label for `filename`: the file's own name, without the folders a
/// recursive scan prefixes it with.
fn label_text(filename: &str) -> &str {
    filename.rsplit_once('/').map_or(filename, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::detector::tests::MockDetector;
    use crate::imaging::{FaceBox, NoFaceDetector};
    use crate::test_helpers::{corrupt_file, png_files, two_up_config};
    use std::sync::mpsc;

    fn builder(config: AlbumConfig) -> AlbumBuilder {
        AlbumBuilder::new(config, Arc::new(NoFaceDetector))
    }

    fn filenames(report: &AlbumReport) -> Vec<String> {
        report
            .pages
            .iter()
            .flat_map(|p| p.slots.iter().map(|s| s.item.filename.clone()))
            .collect()
    }

    // =========================================================================
    // Fatal errors
    // =========================================================================

    #[test]
    fn empty_input_is_no_images() {
        let result = builder(two_up_config()).build(&[]);
        assert!(matches!(result, Err(AlbumError::NoImages)));
    }

    #[test]
    fn zero_pixel_photos_are_rejected_before_work() {
        let mut config = two_up_config();
        config.photo.dpi = 1;
        config.photo.width_inches = 0.3;
        config.photo.height_inches = 0.42;
        let result = builder(config).build(&png_files(1, 40, 56));
        assert!(matches!(
            result,
            Err(AlbumError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn overflowing_default_config_is_rejected_before_work() {
        let detector = Arc::new(MockDetector::default());
        let b = AlbumBuilder::new(AlbumConfig::default(), detector.clone());
        let result = b.build(&png_files(2, 50, 70));
        assert!(matches!(
            result,
            Err(AlbumError::Config(ConfigError::Layout(
                LayoutError::HeightOverflow { .. }
            )))
        ));
        assert_eq!(detector.call_count(), 0);
    }

    #[test]
    fn config_error_wins_over_empty_input() {
        let result = builder(AlbumConfig::default()).build(&[]);
        assert!(matches!(result, Err(AlbumError::Config(_))));
    }

    // =========================================================================
    // Partial failure
    // =========================================================================

    #[test]
    fn three_valid_one_corrupt() {
        let mut files = png_files(3, 80, 60);
        files.insert(1, corrupt_file("broken.png"));

        let report = builder(two_up_config()).build(&files).unwrap();

        assert_eq!(report.photo_count(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].filename, "broken.png");
        assert!(!report.skipped[0].reason.is_empty());
        // No gap where the corrupt file was
        assert_eq!(filenames(&report), vec!["001.png", "002.png", "003.png"]);
        assert_eq!(report.pages.len(), 2);
    }

    #[test]
    fn all_corrupt_yields_no_pages_and_all_skips() {
        let files = vec![corrupt_file("a.jpg"), corrupt_file("b.jpg")];
        let report = builder(two_up_config()).build(&files).unwrap();
        assert!(report.pages.is_empty());
        assert_eq!(report.skipped.len(), 2);
    }

    #[test]
    fn detector_failure_falls_back_to_center() {
        let b = AlbumBuilder::new(two_up_config(), Arc::new(MockDetector::failing()));
        let report = b.build(&png_files(2, 80, 60)).unwrap();
        assert_eq!(report.photo_count(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(report.fallbacks.len(), 2);
        assert_eq!(report.fallbacks[0].filename, "001.png");
    }

    // =========================================================================
    // Layout and ordering
    // =========================================================================

    #[test]
    fn ten_photos_two_per_page_is_five_pages() {
        let report = builder(two_up_config()).build(&png_files(10, 60, 80)).unwrap();

        assert_eq!(report.pages.len(), 5);
        for (i, page) in report.pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert_eq!(page.slots.len(), 2);
        }
        let expected: Vec<String> = (1..=10).map(|i| format!("{i:03}.png")).collect();
        assert_eq!(filenames(&report), expected);
    }

    #[test]
    fn photos_have_target_pixel_size() {
        let config = two_up_config();
        let (tw, th) = config.target_pixels();
        let report = builder(config).build(&png_files(3, 200, 90)).unwrap();
        for page in &report.pages {
            for slot in &page.slots {
                assert_eq!((slot.item.width, slot.item.height), (tw, th));
            }
        }
    }

    #[test]
    fn one_per_page_config() {
        let mut config = two_up_config();
        config.page.photos_per_page = 1;
        let report = builder(config).build(&png_files(3, 60, 80)).unwrap();
        assert_eq!(report.pages.len(), 3);
    }

    #[test]
    fn detector_sees_every_decoded_image_with_config_params() {
        let detector = Arc::new(MockDetector::with_faces(vec![FaceBox::new(
            0.0, 0.0, 10.0, 10.0,
        )]));
        let mut config = two_up_config();
        config.detector.min_neighbors = 3;
        let mut files = png_files(4, 64, 48);
        files.push(corrupt_file("bad.png"));

        AlbumBuilder::new(config, detector.clone())
            .build(&files)
            .unwrap();

        let calls = detector.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(w, h, p)| (*w, *h) == (64, 48) && p.min_neighbors == 3));
    }

    // =========================================================================
    // Events and cancellation
    // =========================================================================

    #[test]
    fn events_cover_every_image() {
        let (tx, rx) = mpsc::channel();
        let mut files = png_files(2, 40, 40);
        files.push(corrupt_file("x.png"));

        builder(two_up_config())
            .with_events(tx)
            .build(&files)
            .unwrap();

        let events: Vec<AlbumEvent> = rx.iter().collect();
        assert_eq!(events[0], AlbumEvent::Started { image_count: 3 });
        let composed = events
            .iter()
            .filter(|e| matches!(e, AlbumEvent::ImageComposed { .. }))
            .count();
        assert_eq!(composed, 2);
        assert!(events.iter().any(|e| matches!(
            e,
            AlbumEvent::ImageSkipped { index: 3, filename, .. } if filename == "x.png"
        )));
    }

    #[test]
    fn cancelled_before_start_processes_nothing() {
        let flag = Arc::new(AtomicBool::new(true));
        let report = builder(two_up_config())
            .with_cancel(flag)
            .build(&png_files(4, 40, 40))
            .unwrap();
        assert_eq!(report.cancelled, 4);
        assert!(report.pages.is_empty());
        assert!(report.skipped.is_empty());
    }

    // =========================================================================
    // Report summary
    // =========================================================================

    #[test]
    fn summary_serializes_without_pixels() {
        let mut files = png_files(3, 40, 40);
        files.push(corrupt_file("bad.tif"));
        let report = builder(two_up_config()).build(&files).unwrap();

        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["page_count"], 2);
        assert_eq!(json["photo_count"], 3);
        assert_eq!(json["skipped"][0]["filename"], "bad.tif");
        assert_eq!(json["pages"][0]["photos"][0]["filename"], "001.png");
        assert_eq!(json["pages"][0]["photos"][0]["width_px"], 60);
        assert!(json["pages"][0]["photos"][0]["placement"]["x"].is_number());
    }

    // =========================================================================
    // Labels
    // =========================================================================

    #[test]
    fn label_is_the_bare_file_name() {
        assert_eq!(label_text("IMG_0001.jpg"), "IMG_0001.jpg");
        assert_eq!(label_text("2023/beach.png"), "beach.png");
        assert_eq!(label_text("2023/deep/x.bmp"), "x.bmp");
    }
}

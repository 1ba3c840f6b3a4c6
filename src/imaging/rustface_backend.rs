//! SeetaFace frontal face detector, via the `rustface` crate.
//!
//! The model (`seeta_fd_frontal_v1.0.bin`) is read once from disk when the
//! detector is built. `rustface` detectors hold mutable scan state, so each
//! [`detect`](FaceDetector::detect) call spins up a fresh detector from a clone
//! of the loaded model; the shared value stays immutable.
//!
//! ## Parameter mapping
//!
//! | [`DetectorParams`] | rustface setting |
//! |---|---|
//! | `scale_factor` (1.1) | `pyramid_scale_factor = 1 / scale_factor` (≈0.91) |
//! | `min_neighbors` (5) | `score_thresh = min_neighbors × 0.4` (2.0) |
//! | `min_size` ([30, 30]) | `min_face_size = min(width, height)` (30) |

use super::detector::{DetectError, FaceDetector};
use super::params::{DetectorParams, FaceBox};
use image::GrayImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Score threshold contributed by each required "neighbor".
const SCORE_PER_NEIGHBOR: f64 = 0.4;

/// Sliding-window step in pixels.
const WINDOW_STEP: u32 = 4;

/// Smallest face size rustface accepts.
const MIN_FACE_FLOOR: u32 = 20;

pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load the SeetaFace model from `path`.
    pub fn from_model_file(path: &Path) -> Result<Self, DetectError> {
        let file = File::open(path)?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| DetectError::Model(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded face model {}", path.display());
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &GrayImage,
        params: &DetectorParams,
    ) -> Result<Vec<FaceBox>, DetectError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectError::Failed(format!(
                "empty image buffer ({width}x{height})"
            )));
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_size[0].min(params.min_size[1]).max(MIN_FACE_FLOOR));
        detector.set_score_thresh(params.min_neighbors as f64 * SCORE_PER_NEIGHBOR);
        detector.set_pyramid_scale_factor(pyramid_scale(params.scale_factor));
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    score: face.score(),
                }
            })
            .collect())
    }
}

/// rustface shrinks the image by this factor per pyramid level; a cascade
/// `scale_factor` grows the window instead, so the two are reciprocal.
fn pyramid_scale(scale_factor: f64) -> f32 {
    (1.0 / scale_factor.max(1.01)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pyramid_scale_is_reciprocal() {
        assert!((pyramid_scale(1.1) - 0.909_091).abs() < 1e-5);
        assert!((pyramid_scale(1.25) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn pyramid_scale_never_reaches_one() {
        assert!(pyramid_scale(1.0) < 1.0);
        assert!(pyramid_scale(0.5) < 1.0);
    }

    #[test]
    fn missing_model_file_is_io_error() {
        let result = RustfaceDetector::from_model_file(Path::new("/nonexistent/model.bin"));
        assert!(matches!(result, Err(DetectError::Io(_))));
    }
}

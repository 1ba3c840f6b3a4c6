//! Face detection capability.
//!
//! The [`FaceDetector`] trait is the single seam between the crop pipeline and
//! whatever actually finds faces. A detector is built once (model loading is
//! the expensive part) and shared by reference across every image of an album,
//! so implementations must be `Send + Sync` and keep per-call scratch state
//! local to [`FaceDetector::detect`].
//!
//! Implementations:
//! - [`RustfaceDetector`](super::rustface_backend::RustfaceDetector): SeetaFace
//!   frontal detector via the `rustface` crate.
//! - [`NoFaceDetector`]: finds nothing; every crop centers on the image.

use super::params::{DetectorParams, FaceBox};
use image::GrayImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load face model: {0}")]
    Model(String),
    #[error("Detection failed: {0}")]
    Failed(String),
}

/// Pluggable face detection capability.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale image.
    ///
    /// Returned boxes are in the image's own pixel space. An empty vector means
    /// "no faces", which is not an error.
    fn detect(&self, gray: &GrayImage, params: &DetectorParams) -> Result<Vec<FaceBox>, DetectError>;
}

/// Detector that never finds a face.
///
/// Used when no detection model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaceDetector;

impl FaceDetector for NoFaceDetector {
    fn detect(&self, _gray: &GrayImage, _params: &DetectorParams) -> Result<Vec<FaceBox>, DetectError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock detector returning canned boxes (or an error) and recording calls.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockDetector {
        pub faces: Vec<FaceBox>,
        pub fail: bool,
        pub calls: Mutex<Vec<(u32, u32, DetectorParams)>>,
    }

    impl MockDetector {
        pub fn with_faces(faces: Vec<FaceBox>) -> Self {
            Self {
                faces,
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl FaceDetector for MockDetector {
        fn detect(
            &self,
            gray: &GrayImage,
            params: &DetectorParams,
        ) -> Result<Vec<FaceBox>, DetectError> {
            self.calls
                .lock()
                .unwrap()
                .push((gray.width(), gray.height(), *params));
            if self.fail {
                return Err(DetectError::Failed("mock detector failure".to_string()));
            }
            Ok(self.faces.clone())
        }
    }

    #[test]
    fn no_face_detector_finds_nothing() {
        let gray = GrayImage::new(64, 64);
        let faces = NoFaceDetector
            .detect(&gray, &DetectorParams::default())
            .unwrap();
        assert!(faces.is_empty());
    }

    #[test]
    fn mock_records_dimensions_and_params() {
        let detector = MockDetector::with_faces(vec![FaceBox::new(1.0, 2.0, 3.0, 4.0)]);
        let gray = GrayImage::new(40, 30);
        let params = DetectorParams {
            min_neighbors: 3,
            ..DetectorParams::default()
        };

        let faces = detector.detect(&gray, &params).unwrap();
        assert_eq!(faces.len(), 1);

        let calls = detector.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 40);
        assert_eq!(calls[0].1, 30);
        assert_eq!(calls[0].2.min_neighbors, 3);
    }

    #[test]
    fn failing_mock_returns_error() {
        let detector = MockDetector::failing();
        let result = detector.detect(&GrayImage::new(8, 8), &DetectorParams::default());
        assert!(matches!(result, Err(DetectError::Failed(_))));
    }
}

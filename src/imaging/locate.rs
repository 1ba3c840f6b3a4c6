//! Focal point estimation for one image.
//!
//! Wraps a shared [`FaceDetector`] and reduces its boxes to a single point.
//! A detector error is not fatal: the image center is used instead and the
//! reason travels back to the caller in [`Located::fallback`].

use super::calculations::{focal_point, image_center};
use super::detector::FaceDetector;
use super::params::{DetectorParams, FaceBox, Point};
use super::source::SourceImage;

/// Result of locating the focal point of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub focal: Point,
    /// Faces the detector reported (empty on fallback).
    pub faces: Vec<FaceBox>,
    /// Why detection was abandoned, when it was.
    pub fallback: Option<String>,
}

/// Focal point finder bound to one detector and one set of sensitivity params.
pub struct FaceLocator<'a> {
    detector: &'a dyn FaceDetector,
    params: DetectorParams,
}

impl<'a> FaceLocator<'a> {
    pub fn new(detector: &'a dyn FaceDetector, params: DetectorParams) -> Self {
        Self { detector, params }
    }

    pub fn locate(&self, image: &SourceImage) -> Located {
        let gray = image.image.to_luma8();
        match self.detector.detect(&gray, &self.params) {
            Ok(faces) => Located {
                focal: focal_point(&faces, image.width, image.height),
                faces,
                fallback: None,
            },
            Err(e) => {
                log::warn!("{}: face detection failed, centering crop: {}", image.filename, e);
                Located {
                    focal: image_center(image.width, image.height),
                    faces: Vec::new(),
                    fallback: Some(e.to_string()),
                }
            }
        }
    }
}

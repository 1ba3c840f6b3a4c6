//! Value types passed between the imaging stages.
//!
//! These structs describe *where* to look and *what* to cut, never how. They
//! flow one way through the pipeline: a [`FaceBox`] list becomes a [`Point`],
//! the point becomes a [`CropRect`], and the rect drives the composer.
//!
//! ## Types
//!
//! - [`Point`]: real-valued pixel coordinate (focal points, face centers).
//! - [`FaceBox`]: one detected face's bounding box in source pixel space.
//! - [`CropRect`]: crop rectangle: floored top-left corner, exact real size.
//! - [`DetectorParams`]: detector sensitivity (scale factor, neighbors, min size).

/// A pixel-space coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector confidence. Not used for the focal point (all faces weigh the same).
    pub score: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score: 0.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Crop rectangle within a source image.
///
/// `x` and `y` are floored to whole pixels. `width` and `height` keep the exact
/// ratio-matching size so `width / height` equals the target ratio; use
/// [`CropRect::pixel_bounds`] to get the integer region actually cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Integer `(x, y, width, height)` for cropping a `source_w × source_h` image.
    ///
    /// Sizes are rounded, never zero, and shrunk when rounding would push the
    /// region past the right or bottom edge.
    pub fn pixel_bounds(&self, source_w: u32, source_h: u32) -> (u32, u32, u32, u32) {
        let x = self.x.min(source_w.saturating_sub(1));
        let y = self.y.min(source_h.saturating_sub(1));
        let w = (self.width.round() as u32).max(1).min(source_w - x);
        let h = (self.height.round() as u32).max(1).min(source_h - y);
        (x, y, w, h)
    }
}

/// Sensitivity settings handed to a [`FaceDetector`](super::FaceDetector).
///
/// Named after the classic cascade-detector knobs:
/// - `scale_factor`: step between detection scales (> 1.0; smaller = finer, slower)
/// - `min_neighbors`: how much agreement a detection needs (higher = fewer, surer faces)
/// - `min_size`: smallest face considered, `[width, height]` in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub min_size: [u32; 2],
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: [30, 30],
        }
    }
}

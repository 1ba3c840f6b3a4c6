//! Pure calculation functions for focal points and crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropRect, FaceBox, Point};

/// Single focal point for an image from its detected faces.
///
/// The unweighted mean of all face-box centers, or the geometric center of the
/// image when no faces were found. Never fails.
///
/// # Examples
/// ```
/// # use print_album::imaging::{focal_point, FaceBox, Point};
/// assert_eq!(focal_point(&[], 800, 600), Point::new(400.0, 300.0));
///
/// let faces = [FaceBox::new(0.0, 0.0, 100.0, 100.0), FaceBox::new(200.0, 0.0, 100.0, 100.0)];
/// assert_eq!(focal_point(&faces, 800, 600), Point::new(150.0, 50.0));
/// ```
pub fn focal_point(faces: &[FaceBox], width: u32, height: u32) -> Point {
    if faces.is_empty() {
        return image_center(width, height);
    }

    let n = faces.len() as f64;
    let (sum_x, sum_y) = faces.iter().map(FaceBox::center).fold((0.0, 0.0), |acc, c| {
        (acc.0 + c.x, acc.1 + c.y)
    });
    Point::new(sum_x / n, sum_y / n)
}

/// Geometric center of a `width × height` image.
pub fn image_center(width: u32, height: u32) -> Point {
    Point::new(width as f64 / 2.0, height as f64 / 2.0)
}

/// Largest crop of `target_ratio` (width / height) that fits the image,
/// centered on `focal` and clamped to stay inside the image.
///
/// Wider-than-target sources keep their full height; everything else keeps
/// the full width. The top-left corner is floored to whole pixels.
///
/// # Examples
/// ```
/// # use print_album::imaging::{plan_crop, Point};
/// // 1400x1000 landscape, 5:7 target, centered → full height, 714.29 wide
/// let crop = plan_crop(1400, 1000, Point::new(700.0, 500.0), 5.0 / 7.0);
/// assert_eq!((crop.x, crop.y), (342, 0));
/// assert_eq!(crop.height, 1000.0);
/// ```
pub fn plan_crop(width: u32, height: u32, focal: Point, target_ratio: f64) -> CropRect {
    let (w, h) = (width as f64, height as f64);
    let source_ratio = w / h;

    let (crop_w, crop_h) = if source_ratio > target_ratio {
        // Source is wider: height is the limiting dimension
        (h * target_ratio, h)
    } else {
        // Source is taller (or equal): width is the limiting dimension
        (w, w / target_ratio)
    };

    let left = (focal.x - crop_w / 2.0).min(w - crop_w).max(0.0);
    let top = (focal.y - crop_h / 2.0).min(h - crop_h).max(0.0);

    CropRect {
        x: left.floor() as u32,
        y: top.floor() as u32,
        width: crop_w,
        height: crop_h,
    }
}

/// Pixel size of a printed photo: `inches × dpi`, rounded per axis.
///
/// ```
/// # use print_album::imaging::target_pixel_size;
/// assert_eq!(target_pixel_size((5.0, 7.0), 300), (1500, 2100));
/// ```
pub fn target_pixel_size(inches: (f64, f64), dpi: u32) -> (u32, u32) {
    let dpi = dpi as f64;
    (
        (inches.0 * dpi).round() as u32,
        (inches.1 * dpi).round() as u32,
    )
}

//! Per-photo image work: pure Rust, no system libraries.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** | `image` (JPEG, PNG, BMP, TIFF) |
//! | **Locate faces** | [`FaceDetector`]: `rustface` SeetaFace model |
//! | **Plan crop** | [`plan_crop`]: pure geometry |
//! | **Resample** | `image::imageops::resize`, Lanczos3 |
//! | **Label** | `rusttype` glyph rasterisation |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for focal point and crop math (unit testable)
//! - **Parameters**: Value types passed between steps
//! - **Detector**: [`FaceDetector`] trait + [`RustfaceDetector`] + [`NoFaceDetector`]
//! - **Locate / Compose**: the stages that combine calculations with pixels

mod calculations;
pub mod compose;
pub mod detector;
pub mod label;
pub mod locate;
mod params;
pub mod rustface_backend;
pub mod source;

pub use calculations::{focal_point, image_center, plan_crop, target_pixel_size};
pub use compose::{ComposedPhoto, ImageComposer, LabelStyle};
pub use detector::{DetectError, FaceDetector, NoFaceDetector};
pub use label::LabelFont;
pub use locate::{FaceLocator, Located};
pub use params::{CropRect, DetectorParams, FaceBox, Point};
pub use rustface_backend::RustfaceDetector;
pub use source::{
    ImageError, SourceFile, SourceImage, is_supported_image, supported_input_extensions,
};

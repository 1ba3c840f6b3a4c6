//! Shared test utilities for the print-album test suite.
//!
//! Everything is synthesised in code: no fixture files, no fonts, no face
//! models. Images are smooth gradients so resampling and cropping produce
//! pixels that differ by position.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = encode(&gradient(400, 300), ImageFormat::Jpeg);
//! let files = vec![SourceFile::new("001.jpg", bytes)];
//!
//! let config = two_up_config();
//! assert!(config.validate().is_ok());
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::config::AlbumConfig;
use crate::imaging::{SourceFile, SourceImage};

// =========================================================================
// Pixels
// =========================================================================

/// RGB gradient: red grows left to right, green top to bottom.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 128])
    })
}

/// Encode `img` in `format`, in memory.
pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .unwrap_or_else(|e| panic!("encoding {format:?} failed: {e}"));
    buf.into_inner()
}

/// A decoded gradient image named `name`.
pub fn source_image(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::from_image(name.to_string(), DynamicImage::ImageRgb8(gradient(width, height)))
        .unwrap()
}

// =========================================================================
// Inputs
// =========================================================================

/// `count` PNG gradients named `001.png`, `002.png`, ...
pub fn png_files(count: usize, width: u32, height: u32) -> Vec<SourceFile> {
    (1..=count)
        .map(|i| {
            SourceFile::new(
                format!("{i:03}.png"),
                encode(&gradient(width, height), ImageFormat::Png),
            )
        })
        .collect()
}

/// Bytes no decoder accepts.
pub fn corrupt_file(name: &str) -> SourceFile {
    SourceFile::new(name, b"\x89PNG\r\n\x1a\nthis is not really a png".to_vec())
}

// =========================================================================
// Config
// =========================================================================

/// Two photos per Letter page at a 5:7 size that fits, at low DPI so tests
/// stay fast. Labels off: no dependency on installed fonts.
pub fn two_up_config() -> AlbumConfig {
    let mut config = AlbumConfig::default();
    config.photo.width_inches = 3.0;
    config.photo.height_inches = 4.2;
    config.photo.dpi = 20;
    config.label.enabled = false;
    config.processing.max_processes = Some(2);
    config
}

//! Source images: raw bytes in, decoded pixels out.
//!
//! Decoding happens inside the pipeline (not in the scanner) so a corrupt or
//! unsupported file becomes a per-image [`ImageError::Decode`] that the album
//! builder records and skips, instead of aborting the whole run.
//!
//! | Format | Extensions | Decoder |
//! |---|---|---|
//! | JPEG | `jpg`, `jpeg` | `image` (pure Rust) |
//! | PNG | `png` | `image` |
//! | BMP | `bmp` | `image` |
//! | TIFF | `tif`, `tiff` | `image` |

use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode {filename}: {reason}")]
    Decode { filename: String, reason: String },
    #[error("Image {filename} has zero size")]
    ZeroDimensions { filename: String },
}

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Lowercase extensions with a decoder compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when `path` has one of the [supported extensions](supported_input_extensions),
/// compared case-insensitively.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// An undecoded input: the file name and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// A decoded input image. Read-only for the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub filename: String,
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    /// Decode `file`, sniffing the format from its content.
    pub fn decode(file: &SourceFile) -> Result<Self, ImageError> {
        let decode_err = |reason: String| ImageError::Decode {
            filename: file.filename.clone(),
            reason,
        };

        let image = ImageReader::new(Cursor::new(&file.bytes))
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?
            .decode()
            .map_err(|e| decode_err(e.to_string()))?;

        Self::from_image(file.filename.clone(), image)
    }

    /// Wrap an already-decoded image.
    pub fn from_image(filename: String, image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ImageError::ZeroDimensions { filename });
        }
        Ok(Self {
            filename,
            image,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode, gradient};

    #[test]
    fn supported_extensions_cover_print_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "bmp", "tif", "tiff"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_supported_image(Path::new("IMG_0001.JPG")));
        assert!(is_supported_image(Path::new("scan.Tiff")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn decode_each_format() {
        let img = gradient(40, 30);
        for format in [
            ImageFormat::Jpeg,
            ImageFormat::Png,
            ImageFormat::Bmp,
            ImageFormat::Tiff,
        ] {
            let file = SourceFile::new("x", encode(&img, format));
            let decoded = SourceImage::decode(&file)
                .unwrap_or_else(|e| panic!("{format:?} failed to decode: {e}"));
            assert_eq!((decoded.width, decoded.height), (40, 30));
        }
    }

    #[test]
    fn decode_keeps_filename() {
        let file = SourceFile::new("001-dawn.png", encode(&gradient(4, 4), ImageFormat::Png));
        assert_eq!(SourceImage::decode(&file).unwrap().filename, "001-dawn.png");
    }

    #[test]
    fn corrupt_bytes_are_a_decode_error() {
        let file = SourceFile::new("broken.jpg", b"not an image at all".to_vec());
        let err = SourceImage::decode(&file).unwrap_err();
        assert!(matches!(err, ImageError::Decode { ref filename, .. } if filename == "broken.jpg"));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let mut bytes = encode(&gradient(64, 64), ImageFormat::Png);
        bytes.truncate(bytes.len() / 2);
        let file = SourceFile::new("half.png", bytes);
        assert!(SourceImage::decode(&file).is_err());
    }
}

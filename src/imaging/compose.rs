//! Crop, resample and label one photo at its final print size.

use super::label::{LabelFont, draw_label};
use super::params::CropRect;
use super::source::SourceImage;
use image::RgbImage;
use image::imageops::FilterType;

/// A photo ready to be placed: exact print pixel size, RGB8.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPhoto {
    /// Source file name; also the label text.
    pub filename: String,
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

/// Label settings for the composer.
pub struct LabelStyle<'a> {
    pub font: &'a LabelFont,
    /// Font size in output pixels.
    pub px: f32,
}

/// Turns a source image and a crop into a [`ComposedPhoto`].
pub struct ImageComposer<'a> {
    target: (u32, u32),
    label: Option<LabelStyle<'a>>,
}

impl<'a> ImageComposer<'a> {
    /// `target` is the output size in pixels; `label` is `None` to skip labeling.
    pub fn new(target: (u32, u32), label: Option<LabelStyle<'a>>) -> Self {
        Self { target, label }
    }

    pub fn compose(&self, source: &SourceImage, crop: &CropRect, label: &str) -> ComposedPhoto {
        let (x, y, w, h) = crop.pixel_bounds(source.width, source.height);
        let (tw, th) = self.target;

        // Normalise to RGB8 after cropping so only the kept region is converted
        let cropped = source.image.crop_imm(x, y, w, h).to_rgb8();
        let mut image = image::imageops::resize(&cropped, tw, th, FilterType::Lanczos3);

        if let Some(style) = &self.label {
            draw_label(&mut image, label, style.font, style.px);
        }

        ComposedPhoto {
            filename: source.filename.clone(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }
}

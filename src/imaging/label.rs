//! Filename labels drawn onto composed photos.
//!
//! Text is rasterised with `rusttype` from a TrueType font found on disk: an
//! explicit `label.font_path`, or the first readable entry of
//! [`SYSTEM_FONT_CANDIDATES`]. Without a usable font the album is still built,
//! just without labels.

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};
use std::path::{Path, PathBuf};

/// Fonts tried, in order, when no font path is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BAND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A loaded label font.
pub struct LabelFont {
    font: Font<'static>,
    source: PathBuf,
}

impl LabelFont {
    /// Load a font from an explicit path.
    pub fn from_file(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        let font = Font::try_from_vec(bytes)?;
        Some(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// Resolve the label font: `configured` if given, else the system candidates.
    ///
    /// Logs a warning and returns `None` when nothing loads.
    pub fn resolve(configured: Option<&Path>) -> Option<Self> {
        let found = match configured {
            Some(path) => Self::from_file(path),
            None => SYSTEM_FONT_CANDIDATES
                .iter()
                .find_map(|p| Self::from_file(Path::new(p))),
        };
        if found.is_none() {
            match configured {
                Some(path) => log::warn!(
                    "Could not load label font {}; photos will not be labeled",
                    path.display()
                ),
                None => log::warn!("No system font found; photos will not be labeled"),
            }
        }
        found
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Width of `text` in pixels at `px` size.
    fn text_width(&self, text: &str, px: f32) -> f32 {
        let scale = Scale::uniform(px);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

/// Height of the label band for a font of `px` pixels: the text plus half its
/// size of padding above and below.
pub fn band_height(px: f32) -> u32 {
    (px * 2.0).ceil() as u32
}

/// Paint a white band across the bottom of `canvas` and center `text` in it.
///
/// The band covers the bottom of the photo rather than extending it, so the
/// canvas keeps its exact print size. Text wider than the canvas is clipped.
pub fn draw_label(canvas: &mut RgbImage, text: &str, font: &LabelFont, px: f32) {
    let (width, height) = canvas.dimensions();
    let band = band_height(px).min(height);
    let band_top = height - band;

    for y in band_top..height {
        for x in 0..width {
            canvas.put_pixel(x, y, BAND_COLOR);
        }
    }

    let scale = Scale::uniform(px);
    let v_metrics = font.font.v_metrics(scale);
    let text_h = v_metrics.ascent - v_metrics.descent;
    let origin_x = (width as f32 - font.text_width(text, px)) / 2.0;
    let baseline = band_top as f32 + (band as f32 - text_h) / 2.0 + v_metrics.ascent;

    for glyph in font.font.layout(text, scale, point(origin_x, baseline)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px_x = bb.min.x + gx as i32;
            let px_y = bb.min.y + gy as i32;
            if px_x < 0 || px_y < band_top as i32 || px_x >= width as i32 || px_y >= height as i32
            {
                return;
            }
            let pixel = canvas.get_pixel_mut(px_x as u32, px_y as u32);
            blend(pixel, TEXT_COLOR, coverage);
        });
    }
}

fn blend(pixel: &mut Rgb<u8>, color: Rgb<u8>, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0);
    for c in 0..3 {
        let mixed = pixel[c] as f32 * (1.0 - a) + color[c] as f32 * a;
        pixel[c] = mixed.round() as u8;
    }
}

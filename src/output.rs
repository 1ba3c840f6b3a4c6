//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every photo is shown the same way at every stage: a 3-digit positional
//! index and its filename on a header line, with details on indented lines
//! below. Page geometry is shown in points, the unit the PDF uses.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Photos in vacation/ (3)
//! 001 IMG_0001.jpg (2.4 MB)
//! 002 IMG_0002.jpg (2.1 MB)
//! 003 notes.png (14.0 KB)
//! ```
//!
//! ## Build progress
//!
//! ```text
//! Composing 3 photos
//!     001 IMG_0001.jpg
//!         Faces: 2
//!     002 IMG_0002.jpg
//!         Skipped: Failed to decode IMG_0002.jpg: ...
//! ```
//!
//! ## Report
//!
//! ```text
//! Page 1
//!     001 IMG_0001.jpg at (126, 252) 360x504pt
//!
//! Skipped (1)
//!     IMG_0002.jpg: Failed to decode ...
//!
//! Built 1 page, 1 photo, 1 skipped
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::album::{AlbumEvent, ReportSummary};
use crate::config::AlbumConfig;
use crate::imaging::SourceFile;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_output(files: &[SourceFile], folder: &Path) -> Vec<String> {
    let mut lines = vec![format!("Photos in {} ({})", folder.display(), files.len())];
    for (i, file) in files.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            file.filename,
            format_size(file.bytes.len())
        ));
    }
    lines
}

pub fn print_scan_output(files: &[SourceFile], folder: &Path) {
    for line in format_scan_output(files, folder) {
        println!("{}", line);
    }
}

// ============================================================================
// Build progress
// ============================================================================

pub fn format_album_event(event: &AlbumEvent) -> Vec<String> {
    match event {
        AlbumEvent::Started { image_count } => {
            vec![format!("Composing {}", plural(*image_count, "photo"))]
        }
        AlbumEvent::ImageComposed {
            index,
            filename,
            faces,
            fallback,
        } => {
            let detail = match fallback {
                Some(reason) => format!("Detection failed, centered: {}", reason),
                None if *faces == 0 => "Faces: none, centered".to_string(),
                None => format!("Faces: {}", faces),
            };
            vec![
                format!("{}{} {}", indent(1), format_index(*index), filename),
                format!("{}{}", indent(2), detail),
            ]
        }
        AlbumEvent::ImageSkipped {
            index,
            filename,
            reason,
        } => vec![
            format!("{}{} {}", indent(1), format_index(*index), filename),
            format!("{}Skipped: {}", indent(2), reason),
        ],
    }
}

// ============================================================================
// Report
// ============================================================================

pub fn format_report(summary: &ReportSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;

    for page in &summary.pages {
        lines.push(format!("Page {}", page.number));
        for photo in &page.photos {
            position += 1;
            let p = &photo.placement;
            lines.push(format!(
                "{}{} {} at ({}, {}) {}x{}pt",
                indent(1),
                format_index(position),
                photo.filename,
                p.x,
                p.y,
                p.width,
                p.height
            ));
        }
    }

    if !summary.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({})", summary.skipped.len()));
        for skip in &summary.skipped {
            lines.push(format!("{}{}: {}", indent(1), skip.filename, skip.reason));
        }
    }

    if !summary.fallbacks.is_empty() {
        lines.push(String::new());
        lines.push(format!("Centered after detection failure ({})", summary.fallbacks.len()));
        for fb in &summary.fallbacks {
            lines.push(format!("{}{}: {}", indent(1), fb.filename, fb.reason));
        }
    }

    if summary.cancelled > 0 {
        lines.push(String::new());
        lines.push(format!(
            "Cancelled: {} not started",
            plural(summary.cancelled, "photo")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {} skipped",
        plural(summary.page_count, "page"),
        plural(summary.photo_count, "photo"),
        summary.skipped.len()
    ));
    lines
}

pub fn print_report(summary: &ReportSummary) {
    for line in format_report(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Config check
// ============================================================================

/// Describe the effective configuration and the slot positions it yields.
pub fn format_config_check(config: &AlbumConfig) -> Vec<String> {
    let (px_w, px_h) = config.target_pixels();
    let [aw, ah] = config.photo.aspect_ratio;
    let g = config.geometry();

    let mut lines = vec![
        "Photo".to_string(),
        format!(
            "{}{}x{}in at {}dpi = {}x{}px, crop {}:{}",
            indent(1),
            config.photo.width_inches,
            config.photo.height_inches,
            config.photo.dpi,
            px_w,
            px_h,
            aw,
            ah
        ),
        "Page".to_string(),
        format!(
            "{}{}x{}in, {} per page, margin {}pt, spacing {}pt",
            indent(1),
            config.page.width_inches,
            config.page.height_inches,
            config.page.photos_per_page,
            config.page.margin_points,
            config.page.spacing_points
        ),
        format!(
            "{}Height needed {}pt of {}pt",
            indent(1),
            g.required_height(),
            g.page_height
        ),
    ];
    for i in 0..config.page.photos_per_page {
        let p = g.slot_placement(i);
        lines.push(format!(
            "{}Slot {}: ({}, {}) {}x{}pt",
            indent(2),
            i + 1,
            p.x,
            p.y,
            p.width,
            p.height
        ));
    }

    lines.push("Detector".to_string());
    lines.push(match &config.detector.model_path {
        Some(path) => format!("{}Model: {}", indent(1), path.display()),
        None => format!("{}No model: crops center on each photo", indent(1)),
    });
    lines.push("Labels".to_string());
    lines.push(if config.label.enabled {
        match &config.label.font_path {
            Some(path) => format!(
                "{}{}pt ({}px), font {}",
                indent(1),
                config.label.font_points,
                config.label_px().round(),
                path.display()
            ),
            None => format!(
                "{}{}pt ({}px), system font",
                indent(1),
                config.label.font_points,
                config.label_px().round()
            ),
        }
    } else {
        format!("{}Disabled", indent(1))
    });
    lines
}

pub fn print_config_check(config: &AlbumConfig) {
    for line in format_config_check(config) {
        println!("{}", line);
    }
}

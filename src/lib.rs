//! # Print Album
//!
//! Turns a folder of photographs into a print-ready PDF album. Each photo is
//! cropped to a fixed aspect ratio around the faces in it, labeled with its
//! filename, and stacked in a centered column on letter-size pages at print
//! resolution.
//!
//! # Pipeline
//!
//! ```text
//! folder ──scan──▶ SourceFile ──decode──▶ SourceImage
//!                                             │
//!            FaceLocator ◀────────────────────┤
//!                 │ focal point               │
//!                 ▼                           │
//!            plan_crop ──── CropRect ──▶ ImageComposer ──▶ ComposedPhoto
//!                                                              │
//!                                       layout ◀───────────────┘
//!                                          │ Page<ComposedPhoto>
//!                                          ▼
//!                                      write_pdf
//! ```
//!
//! Every step after scanning is a pure value transformation. Nothing is
//! mutated once created, so per-photo work runs in parallel without locks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Reads supported images from the photo folder |
//! | [`imaging`] | Decode, face location, crop geometry, resampling and labels |
//! | [`layout`] | Page geometry: slot placements in PDF points, overflow checks |
//! | [`album`] | Orchestrates the per-photo chain and collects skips and fallbacks |
//! | [`pdf`] | Writes pages and photos to a PDF with `lopdf` |
//! | [`config`] | `album.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting for progress and the final report |
//!
//! # Design Decisions
//!
//! ## Face detection is a capability, not a dependency
//!
//! The crop pipeline only sees the [`imaging::FaceDetector`] trait. The
//! shipped implementation wraps the `rustface` SeetaFace detector, which needs
//! a model file; without one, [`imaging::NoFaceDetector`] is used and every
//! crop centers on the image. Tests inject a mock.
//!
//! ## Skips, not failures
//!
//! A corrupt photo is dropped from the album and listed in the report. Only a
//! bad configuration or an empty folder stops a build.
//!
//! ## Validated layouts
//!
//! Page geometry is checked before any photo is processed. A configuration
//! whose photos would run off the page is an error, never a silently clipped
//! PDF. This includes the stock defaults: two 5x7 photos do not fit on Letter.

pub mod album;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Page layout: which photo goes on which page, and where.
//!
//! Coordinates are PDF points (72 per inch) with the origin at the bottom-left
//! of the page, y growing upward. Photos are stacked top to bottom in a single
//! centered column:
//!
//! ```text
//!  ┌──────────── page_width ────────────┐
//!  │              margin                │
//!  │      ┌──────────────────────┐      │  ← slot 0 top = page_height - margin
//!  │      │        slot 0        │      │
//!  │      └──────────────────────┘      │
//!  │              spacing               │
//!  │      ┌──────────────────────┐      │
//!  │      │        slot 1        │      │
//!  │      └──────────────────────┘      │
//!  │                ...                 │
//!  └────────────────────────────────────┘
//! ```
//!
//! The engine never emits a placement that falls off the page:
//! [`PageGeometry::validate`] rejects any geometry whose column of photos does
//! not fit, and [`layout`] refuses to run on an invalid geometry. Layout is a
//! pure function of the geometry and the number of items.

use serde::Serialize;
use thiserror::Error;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error(
        "{photos_per_page} photo(s) per page need {required}pt of page height \
         (2 × {margin}pt margin + photos + spacing) but the page is {available}pt tall"
    )]
    HeightOverflow {
        photos_per_page: usize,
        margin: f64,
        required: f64,
        available: f64,
    },
    #[error(
        "photo width {photo_width}pt plus 2 × {margin}pt margin exceeds page width {page_width}pt"
    )]
    WidthOverflow {
        photo_width: f64,
        margin: f64,
        page_width: f64,
    },
    #[error("photos_per_page must be at least 1")]
    NoSlots,
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// Rectangle on a page, in points, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// True when the two rectangles share interior area.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }
}

/// Fixed page geometry, all lengths in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub photo_width: f64,
    pub photo_height: f64,
    pub margin: f64,
    pub spacing: f64,
    pub photos_per_page: usize,
}

impl PageGeometry {
    /// Build from inch-denominated page and photo sizes.
    pub fn from_inches(
        page: (f64, f64),
        photo: (f64, f64),
        margin: f64,
        spacing: f64,
        photos_per_page: usize,
    ) -> Self {
        Self {
            page_width: page.0 * POINTS_PER_INCH,
            page_height: page.1 * POINTS_PER_INCH,
            photo_width: photo.0 * POINTS_PER_INCH,
            photo_height: photo.1 * POINTS_PER_INCH,
            margin,
            spacing,
            photos_per_page,
        }
    }

    /// Vertical space the full column of photos needs, margins included.
    pub fn required_height(&self) -> f64 {
        let n = self.photos_per_page as f64;
        self.margin * 2.0 + n * self.photo_height + (n - 1.0).max(0.0) * self.spacing
    }

    /// Reject geometries that would place any slot off the page.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (name, value) in [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("photo width", self.photo_width),
            ("photo height", self.photo_height),
            ("margin", self.margin),
            ("spacing", self.spacing),
        ] {
            if !value.is_finite() {
                return Err(LayoutError::NonFinite(name));
            }
        }
        for (name, value) in [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("photo width", self.photo_width),
            ("photo height", self.photo_height),
        ] {
            if value <= 0.0 {
                return Err(LayoutError::NonPositive(name));
            }
        }
        if self.margin < 0.0 {
            return Err(LayoutError::NonPositive("margin"));
        }
        if self.spacing < 0.0 {
            return Err(LayoutError::NonPositive("spacing"));
        }
        if self.photos_per_page == 0 {
            return Err(LayoutError::NoSlots);
        }
        if self.margin * 2.0 + self.photo_width > self.page_width {
            return Err(LayoutError::WidthOverflow {
                photo_width: self.photo_width,
                margin: self.margin,
                page_width: self.page_width,
            });
        }
        let required = self.required_height();
        if required > self.page_height {
            return Err(LayoutError::HeightOverflow {
                photos_per_page: self.photos_per_page,
                margin: self.margin,
                required,
                available: self.page_height,
            });
        }
        Ok(())
    }

    /// Placement of the slot at zero-based `index`, counted from the top.
    ///
    /// Pure arithmetic; does not check that the slot is on the page.
    pub fn slot_placement(&self, index: usize) -> Placement {
        let x = (self.page_width - self.photo_width) / 2.0;
        let first_top = self.page_height - self.margin;
        let top = first_top - index as f64 * (self.photo_height + self.spacing);
        Placement {
            x,
            y: top - self.photo_height,
            width: self.photo_width,
            height: self.photo_height,
        }
    }
}

/// One item at one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    pub item: T,
    pub placement: Placement,
}

/// One output page. `number` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub number: usize,
    pub slots: Vec<Slot<T>>,
}

/// Assign `items`, in order, to consecutive pages of `photos_per_page` slots.
///
/// The last page may hold fewer items. No items yields no pages.
pub fn layout<T>(items: Vec<T>, geometry: &PageGeometry) -> Result<Vec<Page<T>>, LayoutError> {
    geometry.validate()?;

    let per_page = geometry.photos_per_page;
    let mut pages: Vec<Page<T>> = Vec::with_capacity(items.len().div_ceil(per_page));

    for (i, item) in items.into_iter().enumerate() {
        let slot_index = i % per_page;
        if slot_index == 0 {
            pages.push(Page {
                number: pages.len() + 1,
                slots: Vec::with_capacity(per_page),
            });
        }
        let placement = geometry.slot_placement(slot_index);
        if let Some(page) = pages.last_mut() {
            page.slots.push(Slot { item, placement });
        }
    }

    Ok(pages)
}

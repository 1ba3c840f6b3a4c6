//! PDF output.
//!
//! One PDF page per layout page. Each composed photo is embedded once as an
//! 8-bit DeviceRGB image XObject and drawn into its placement rectangle, so the
//! printed size comes from the layout in points while the pixel data keeps the
//! full DPI. Streams are Flate-compressed, which is lossless.
//!
//! ```text
//! q
//!   w 0 0 h x y cm    % scale the unit square to the placement
//!   /Im1 Do
//! Q
//! ```

use crate::imaging::ComposedPhoto;
use crate::layout::{Page, PageGeometry, Placement};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Lopdf(#[from] lopdf::Error),
    #[error("Nothing to write: the album has no pages")]
    Empty,
}

const PRODUCER: &str = concat!("print-album ", env!("CARGO_PKG_VERSION"));

/// Build the PDF document for `pages` in memory.
pub fn render_pdf(
    pages: &[Page<ComposedPhoto>],
    geometry: &PageGeometry,
) -> Result<Document, PdfError> {
    if pages.is_empty() {
        return Err(PdfError::Empty);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let media_box: Vec<Object> = vec![
        real(0.0),
        real(0.0),
        real(geometry.page_width),
        real(geometry.page_height),
    ];

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, page, pages_id, &media_box)?;
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.compress();
    Ok(doc)
}

/// Render `pages` and save them to `path`.
pub fn write_pdf(
    pages: &[Page<ComposedPhoto>],
    geometry: &PageGeometry,
    path: &Path,
) -> Result<(), PdfError> {
    let mut doc = render_pdf(pages, geometry)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    doc.save(path)?;
    Ok(())
}

fn add_page(
    doc: &mut Document,
    page: &Page<ComposedPhoto>,
    parent: ObjectId,
    media_box: &[Object],
) -> Result<ObjectId, PdfError> {
    let mut xobjects = Dictionary::new();
    let mut operations = Vec::new();

    for (i, slot) in page.slots.iter().enumerate() {
        let name = format!("Im{}", i + 1);
        let image_id = doc.add_object(image_xobject(&slot.item));
        xobjects.set(name.as_bytes().to_vec(), image_id);
        operations.extend(draw_image(&name, &slot.placement));
    }

    let content = Content { operations }.encode()?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => media_box.to_vec(),
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => xobjects,
        },
    }))
}

fn image_xobject(photo: &ComposedPhoto) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => photo.width as i64,
            "Height" => photo.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        photo.image.as_raw().clone(),
    )
}

fn draw_image(name: &str, placement: &Placement) -> [Operation; 4] {
    [
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                real(placement.width),
                real(0.0),
                real(0.0),
                real(placement.height),
                real(placement.x),
                real(placement.y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

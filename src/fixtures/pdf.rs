//! Single-page US Letter PDFs drawn with the base-14 Helvetica fonts.

use super::logo::Logo;
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
const AUTHOR: &str = "Tika Samples";
const CREATION_DATE: &str = "D:20250922000000Z";

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const LOGO_XOBJECT: &str = "Im1";

pub struct DocInfo<'a> {
    pub title: &'a str,
    pub subject: &'a str,
    pub keywords: &'a str,
}

fn num(v: f32) -> Object {
    Object::Real(v.into())
}

/// Accumulates content-stream operations for one page.
#[derive(Default)]
struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    fn draw_string(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font.into(), num(size)]));
        self.ops.push(Operation::new("Td", vec![num(x), num(y)]));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Text object starting at `(x, y)`, one `T*` per line at a leading of 1.2 x size.
    fn draw_lines(&mut self, font: &str, size: f32, x: f32, y: f32, lines: &[&str]) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font.into(), num(size)]));
        self.ops.push(Operation::new("TL", vec![num(size * 1.2)]));
        self.ops.push(Operation::new("Td", vec![num(x), num(y)]));
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.ops.push(Operation::new("T*", vec![]));
            }
            self.ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(Operation::new("m", vec![num(x1), num(y1)]));
        self.ops.push(Operation::new("l", vec![num(x2), num(y2)]));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Places an XObject inside the box, scaled to fit and centred, aspect ratio kept.
    fn draw_image_fit(&mut self, name: &str, px: (u32, u32), x: f32, y: f32, w: f32, h: f32) {
        let (iw, ih) = (px.0.max(1) as f32, px.1.max(1) as f32);
        let scale = (w / iw).min(h / ih);
        let (dw, dh) = (iw * scale, ih * scale);
        let (dx, dy) = (x + (w - dw) / 2.0, y + (h - dh) / 2.0);
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![num(dw), num(0.0), num(0.0), num(dh), num(dx), num(dy)],
        ));
        self.ops.push(Operation::new("Do", vec![name.into()]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

fn assemble(info: &DocInfo<'_>, canvas: Canvas, logo: Option<&Logo>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    };
    if let Some(logo) = logo {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(logo.width()),
                "Height" => i64::from(logo.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            logo.image.as_raw().clone(),
        );
        let image_id = doc.add_object(image);
        resources.set("XObject", dictionary! { LOGO_XOBJECT => image_id });
    }
    let resources_id = doc.add_object(resources);

    let content = Content {
        operations: canvas.ops,
    };
    let encoded = content.encode().with_context(|| "encoding PDF content stream")?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![num(0.0), num(0.0), num(PAGE_WIDTH), num(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(info.title),
        "Author" => Object::string_literal(AUTHOR),
        "Subject" => Object::string_literal(info.subject),
        "Keywords" => Object::string_literal(info.keywords),
        "Creator" => Object::string_literal(env!("CARGO_PKG_NAME")),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
        "CreationDate" => Object::string_literal(CREATION_DATE),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).with_context(|| "serializing PDF")?;
    Ok(buf)
}

pub const TEXT_TITLE: &str = "Tika PDF: Text & Metadata";
pub const TEXT_LINES: [&str; 3] = [
    "This PDF contains plain text and document metadata.",
    "Use it to test Tika's /tika or /meta endpoints.",
    "ASCII-only text to avoid font issues.",
];

/// Title plus an ASCII-only body block, so no font embedding is needed.
pub fn build_text() -> Result<Vec<u8>> {
    let mut c = Canvas::default();
    c.draw_string(FONT_BOLD, 16.0, 72.0, 720.0, TEXT_TITLE);
    c.draw_lines(FONT_REGULAR, 12.0, 72.0, 690.0, &TEXT_LINES);
    let info = DocInfo {
        title: TEXT_TITLE,
        subject: "Simple text page with metadata",
        keywords: "tika, pdf, sample",
    };
    assemble(&info, c, None)
}

pub const TABLE_ROWS: [[&str; 3]; 4] = [
    ["Item", "Qty", "Price"],
    ["Widget", "3", "9.99"],
    ["Gadget", "5", "2.50"],
    ["Thing", "1", "199.95"],
];
const TABLE_X0: f32 = 72.0;
const TABLE_Y0: f32 = 500.0;
const COL_WIDTHS: [f32; 3] = [200.0, 100.0, 100.0];
const ROW_HEIGHT: f32 = 22.0;

/// Left edge of each column followed by the table's right edge.
fn column_offsets(widths: &[f32]) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(widths.len() + 1);
    let mut acc = 0.0;
    offsets.push(acc);
    for w in widths {
        acc += w;
        offsets.push(acc);
    }
    offsets
}

fn draw_table(c: &mut Canvas, x0: f32, y0: f32, widths: &[f32], row_h: f32, rows: &[[&str; 3]]) {
    let offsets = column_offsets(widths);
    let total_w = offsets.last().copied().unwrap_or(0.0);
    let total_h = rows.len() as f32 * row_h;

    for i in 0..=rows.len() {
        let y = y0 - i as f32 * row_h;
        c.line(x0, y, x0 + total_w, y);
    }
    for off in &offsets {
        c.line(x0 + off, y0, x0 + off, y0 - total_h);
    }

    for (r, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let x = x0 + 6.0 + offsets[j];
            let y = y0 - (r as f32 + 1.0) * row_h + 6.0;
            c.draw_string(FONT_REGULAR, 12.0, x, y, cell);
        }
    }
}

/// Title, the logo in a 2x1 inch box and a hand-ruled 4x3 table.
pub fn build_image_table(logo: &Logo) -> Result<Vec<u8>> {
    let mut c = Canvas::default();
    c.draw_string(FONT_BOLD, 16.0, 72.0, 720.0, "PDF with Image & Table");
    c.draw_image_fit(
        LOGO_XOBJECT,
        (logo.width(), logo.height()),
        72.0,
        540.0,
        144.0,
        72.0,
    );
    draw_table(&mut c, TABLE_X0, TABLE_Y0, &COL_WIDTHS, ROW_HEIGHT, &TABLE_ROWS);
    let info = DocInfo {
        title: "Tika PDF: Image & Table",
        subject: "Bitmap image and drawn table",
        keywords: "tika, pdf, image, table",
    };
    assemble(&info, c, Some(logo))
}

use crate::config::Generator;
use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 200;
pub const LABEL: &str = "TIKA";

const BACKGROUND: Rgb<u8> = Rgb([240, 240, 240]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const BORDER_WIDTH: u32 = 3;

/// The rendered logo, shared read-only by the DOCX and PDF generators.
pub struct Logo {
    pub image: RgbImage,
    pub png: Vec<u8>,
}

impl Logo {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub fn build(cfg: &Generator) -> Result<Logo> {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    // Outline from (10,10) to (390,190) inclusive, drawn inward.
    for t in 0..BORDER_WIDTH {
        let rect = Rect::at(10 + t as i32, 10 + t as i32).of_size(381 - 2 * t, 181 - 2 * t);
        draw_hollow_rect_mut(&mut img, rect, INK);
    }

    match load_font(&cfg.font_candidates) {
        Some(font) => {
            draw_text_mut(&mut img, INK, 40, 70, PxScale::from(cfg.font_px), &font, LABEL);
        }
        None => {
            warn!("no TrueType font available for logo label; using built-in bitmap font");
            let dot = ((cfg.font_px / 8.0).round() as u32).max(1);
            draw_bitmap_text(&mut img, 40, 70, dot, LABEL);
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .with_context(|| "encoding logo PNG")?;
    Ok(Logo { image: img, png })
}

fn load_font(candidates: &[String]) -> Option<FontVec> {
    for candidate in candidates {
        let path = Path::new(candidate);
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                debug!("logo font: {}", path.display());
                return Some(font);
            }
            Err(err) => debug!("skipping font {}: {err}", path.display()),
        }
    }
    None
}

fn draw_bitmap_text(img: &mut RgbImage, x: i32, y: i32, dot: u32, text: &str) {
    let advance = (GLYPH_COLS as i32 + 1) * dot as i32;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let gx = x + i as i32 * advance;
        for (r, bits) in rows.iter().enumerate() {
            for c in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - c)) != 0 {
                    let px = gx + (c * dot) as i32;
                    let py = y + r as i32 * dot as i32;
                    draw_filled_rect_mut(img, Rect::at(px, py).of_size(dot, dot), INK);
                }
            }
        }
    }
}

const GLYPH_COLS: u32 = 5;

// 5x7 cells, one byte per row, high bit on the left.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        _ => return None,
    };
    Some(rows)
}

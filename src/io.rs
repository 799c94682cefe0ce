//! Loading targets and glyph sheets through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::bitmap::Bitmap;
use crate::glyph::{GlyphSheet, SheetLayout};
use crate::util::{PeelError, PeelResult};
use std::path::Path;

/// Binarizes an 8-bit grayscale buffer.
pub fn bitmap_from_gray(img: &image::GrayImage) -> PeelResult<Bitmap> {
    Bitmap::binarize(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts any decoded image to luma and binarizes it.
pub fn bitmap_from_dynamic(img: &image::DynamicImage) -> PeelResult<Bitmap> {
    bitmap_from_gray(&img.to_luma8())
}

/// Decodes an in-memory image file (PNG, JPEG or GIF) and binarizes it.
pub fn bitmap_from_bytes(bytes: &[u8]) -> PeelResult<Bitmap> {
    let img = image::load_from_memory(bytes).map_err(|err| PeelError::ImageIo {
        reason: err.to_string(),
    })?;
    bitmap_from_dynamic(&img)
}

/// Loads an image from disk and binarizes it.
pub fn load_bitmap<P: AsRef<Path>>(path: P) -> PeelResult<Bitmap> {
    let img = image::open(path).map_err(|err| PeelError::ImageIo {
        reason: err.to_string(),
    })?;
    bitmap_from_dynamic(&img)
}

/// Loads a reference font sheet with dark glyphs on a light background.
pub fn load_glyph_sheet<P: AsRef<Path>>(path: P, layout: SheetLayout) -> PeelResult<GlyphSheet> {
    GlyphSheet::new(load_bitmap(path)?, layout)
}

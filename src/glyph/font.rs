//! Glyph source that rasterizes a TrueType/OpenType font.
//!
//! Available when the `font` feature is enabled. Outlines come from
//! `ttf-parser` and are filled with `tiny-skia`.

use crate::bitmap::Bitmap;
use crate::glyph::GlyphSource;
use crate::util::{PeelError, PeelResult};
use std::path::Path;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use ttf_parser::{Face, OutlineBuilder};

/// Font glyphs rendered white-on-black at a fixed pixel size.
///
/// Each symbol is drawn on its own `2 * size_px` square canvas with the pen
/// at the top-left corner and the baseline one ascender below it. Any
/// non-zero coverage counts as lit ink.
#[derive(Clone, Debug)]
pub struct FontGlyphs {
    data: Vec<u8>,
    face_index: u32,
    size_px: u32,
}

impl FontGlyphs {
    /// Wraps raw font bytes, checking that they parse.
    pub fn new(data: Vec<u8>, size_px: u32) -> PeelResult<Self> {
        if size_px == 0 {
            return Err(PeelError::InvalidConfig("font size must be > 0"));
        }
        Face::parse(&data, 0).map_err(|err| PeelError::Font {
            reason: err.to_string(),
        })?;
        Ok(Self {
            data,
            face_index: 0,
            size_px,
        })
    }

    /// Reads a font file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, size_px: u32) -> PeelResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| PeelError::Font {
            reason: format!("{}: {err}", path.display()),
        })?;
        Self::new(data, size_px)
    }

    /// Pixel size the glyphs are rendered at.
    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    fn face(&self) -> PeelResult<Face<'_>> {
        Face::parse(&self.data, self.face_index).map_err(|err| PeelError::Font {
            reason: err.to_string(),
        })
    }

    fn render(&self, face: &Face<'_>, symbol: char) -> PeelResult<Bitmap> {
        let id = face.glyph_index(symbol).ok_or(PeelError::Font {
            reason: format!("font has no glyph for {symbol:?}"),
        })?;
        let side = self.size_px as usize * 2;
        let scale = self.size_px as f32 / face.units_per_em().max(1) as f32;
        let mut pen = PenPath {
            path: PathBuilder::new(),
            scale,
            baseline: face.ascender() as f32 * scale,
        };
        let mut pixmap =
            Pixmap::new(side as u32, side as u32).ok_or(PeelError::InvalidDimensions {
                width: side,
                height: side,
            })?;
        // Outline-less glyphs (spaces) leave the canvas blank.
        if face.outline_glyph(id, &mut pen).is_some() {
            if let Some(path) = pen.path.finish() {
                let mut paint = Paint::default();
                paint.set_color_rgba8(255, 255, 255, 255);
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        let data = pixmap.pixels().iter().map(|px| px.alpha() != 0).collect();
        Bitmap::new(data, side, side)
    }
}

impl GlyphSource for FontGlyphs {
    fn glyphs(&self) -> PeelResult<Vec<(char, Bitmap)>> {
        let face = self.face()?;
        ('A'..='Z')
            .chain('0'..='9')
            .map(|symbol| Ok((symbol, self.render(&face, symbol)?)))
            .collect()
    }
}

/// Maps font units (y up) onto canvas pixels (y down).
struct PenPath {
    path: PathBuilder,
    scale: f32,
    baseline: f32,
}

impl PenPath {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for PenPath {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.path.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

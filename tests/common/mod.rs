//! Synthetic block font and captcha composer shared by integration tests.
#![allow(dead_code)]

use peelmatch::lowlevel::centered_y;
use peelmatch::{Bitmap, GlyphLibrary, GlyphMap, LibraryConfig};

const SCALE: usize = 3;

const PATTERNS: &[(char, [&str; 7])] = &[
    ('3', ["####.", "....#", "....#", ".###.", "....#", "....#", "####."]),
    ('7', ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."]),
    ('A', [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('K', ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"]),
    ('P', ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."]),
];

/// 5x7 block glyph scaled up, ink lit.
pub fn block_glyph(symbol: char) -> Bitmap {
    let (_, rows) = PATTERNS
        .iter()
        .find(|(s, _)| *s == symbol)
        .expect("symbol in test font");
    let width = 5 * SCALE;
    let height = 7 * SCALE;
    let mut bmp = Bitmap::filled(width, height, false).unwrap();
    for (row, line) in rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c != '#' {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    bmp.set(col * SCALE + dx, row * SCALE + dy, true);
                }
            }
        }
    }
    bmp
}

/// Library over the given symbols of the block font.
pub fn library_of(symbols: &str) -> GlyphLibrary {
    let source: GlyphMap = symbols.chars().map(|s| (s, block_glyph(s))).collect();
    GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap()
}

/// Library over the whole block font.
pub fn full_library() -> GlyphLibrary {
    library_of("37AEKP")
}

/// Draws rotated glyphs as dark ink on a light canvas.
///
/// Each placement is `(symbol, x, angle)`; the glyph is vertically centered
/// the same way the decoder centers its templates.
pub fn compose(
    library: &GlyphLibrary,
    width: usize,
    height: usize,
    placements: &[(char, usize, i32)],
) -> Bitmap {
    let mut canvas = Bitmap::filled(width, height, true).unwrap();
    for &(symbol, x, angle) in placements {
        let tpl = library
            .get(symbol)
            .unwrap()
            .rotate_and_trim(angle as f64)
            .unwrap();
        let y = centered_y(height, tpl.height());
        for ty in 0..tpl.height() {
            for tx in 0..tpl.width() {
                if tpl.get(tx, ty) == Some(false) {
                    canvas.set(x + tx, y + ty, false);
                }
            }
        }
    }
    canvas
}

//! Glyph source backed by a reference font sheet laid out on a grid.

use crate::bitmap::{Bitmap, Rect};
use crate::glyph::GlyphSource;
use crate::util::{PeelError, PeelResult};

/// Grid geometry of a reference font sheet.
///
/// Cells are numbered row-major starting at zero. Digits `0-9` occupy
/// consecutive cells starting at `digit_start`, letters `A-Z` consecutive
/// cells starting at `letter_start`. Cell origins are truncated to whole
/// pixels; each glyph lives in a `glyph_size` box at `glyph_offset` from its
/// cell origin.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetLayout {
    /// Number of cells per row.
    pub columns: usize,
    /// Cell width in pixels (may be fractional).
    pub cell_width: f64,
    /// Cell height in pixels (may be fractional).
    pub cell_height: f64,
    /// Offset of the glyph box from the cell origin.
    pub glyph_offset: (usize, usize),
    /// Size of the glyph box.
    pub glyph_size: (usize, usize),
    /// Cell index of `0`.
    pub digit_start: usize,
    /// Cell index of `A`.
    pub letter_start: usize,
}

impl Default for SheetLayout {
    /// Layout of the 8x20 "Delargo DT Black" character map.
    fn default() -> Self {
        Self {
            columns: 8,
            cell_width: 711.0 / 8.0,
            cell_height: 1699.0 / 20.0,
            glyph_offset: (16, 16),
            glyph_size: (72, 72),
            digit_start: 17,
            letter_start: 34,
        }
    }
}

impl SheetLayout {
    /// Symbols present on the sheet with their cell indices.
    pub fn cells(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        let digits = ('0'..='9').zip(self.digit_start..);
        let letters = ('A'..='Z').zip(self.letter_start..);
        digits.chain(letters)
    }

    /// Pixel box of the glyph stored in cell `index`.
    pub fn glyph_rect(&self, index: usize) -> Rect {
        let row = index / self.columns;
        let col = index % self.columns;
        let x = (col as f64 * self.cell_width) as usize;
        let y = (row as f64 * self.cell_height) as usize;
        Rect::new(
            x + self.glyph_offset.0,
            y + self.glyph_offset.1,
            self.glyph_size.0,
            self.glyph_size.1,
        )
    }
}

/// Binarized reference sheet with dark glyphs on a light background.
#[derive(Clone, Debug)]
pub struct GlyphSheet {
    sheet: Bitmap,
    layout: SheetLayout,
}

impl GlyphSheet {
    /// Wraps a binarized sheet; ink is expected to be unlit.
    pub fn new(sheet: Bitmap, layout: SheetLayout) -> PeelResult<Self> {
        if layout.columns == 0 {
            return Err(PeelError::InvalidConfig("sheet layout needs at least one column"));
        }
        if layout.glyph_size.0 == 0 || layout.glyph_size.1 == 0 {
            return Err(PeelError::InvalidConfig("sheet glyph box must be non-empty"));
        }
        Ok(Self { sheet, layout })
    }

    /// Returns the sheet layout.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }
}

impl GlyphSource for GlyphSheet {
    fn glyphs(&self) -> PeelResult<Vec<(char, Bitmap)>> {
        self.layout
            .cells()
            .map(|(symbol, index)| {
                let cell = self.sheet.crop(self.layout.glyph_rect(index))?;
                Ok((symbol, cell.invert()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{GlyphSheet, SheetLayout};
    use crate::bitmap::{Bitmap, Rect};
    use crate::glyph::{GlyphLibrary, GlyphSource, LibraryConfig};

    #[test]
    fn default_layout_places_zero_and_a() {
        let layout = SheetLayout::default();
        // Cell 17 is row 2, column 1.
        assert_eq!(layout.glyph_rect(17), Rect::new(88 + 16, 169 + 16, 72, 72));
        let cells: Vec<_> = layout.cells().collect();
        assert_eq!(cells.len(), 36);
        assert_eq!(cells[0], ('0', 17));
        assert_eq!(cells[9], ('9', 26));
        assert_eq!(cells[10], ('A', 34));
        assert_eq!(cells[35], ('Z', 59));
    }

    fn tiny_layout() -> SheetLayout {
        SheetLayout {
            columns: 6,
            cell_width: 4.0,
            cell_height: 4.0,
            glyph_offset: (1, 1),
            glyph_size: (2, 2),
            digit_start: 0,
            letter_start: 10,
        }
    }

    #[test]
    fn sheet_inverts_dark_ink() {
        let layout = tiny_layout();
        // 6 columns x 6 rows of 4px cells, all light except one dark pixel per cell.
        let mut sheet = Bitmap::filled(24, 24, true).unwrap();
        for index in 0..36 {
            let rect = layout.glyph_rect(index);
            sheet.set(rect.x, rect.y, false);
        }
        let source = GlyphSheet::new(sheet, layout).unwrap();
        let glyphs = source.glyphs().unwrap();
        assert_eq!(glyphs.len(), 36);
        assert_eq!(glyphs[0].1.lit_count(), 1);

        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        assert_eq!(library.len(), 33);
        assert_eq!(library.get('A').unwrap().size(), (1, 1));
    }
}

//! Glyph templates and the symbol library used by the decoder.
//!
//! A [`GlyphLibrary`] is built once from a [`GlyphSource`] and never mutated
//! afterwards. Each stored glyph is trimmed to its ink, which is lit.

use crate::bitmap::Bitmap;
use crate::util::{PeelError, PeelResult};
use std::collections::BTreeMap;

pub mod bank;
#[cfg(feature = "font")]
mod font;
mod sheet;

pub use bank::RotationBank;
#[cfg(feature = "font")]
pub use font::FontGlyphs;
pub use sheet::{GlyphSheet, SheetLayout};

/// Symbols that look too alike in the reference font to tell apart.
pub const DEFAULT_EXCLUDED: &str = "ILJ";

/// Produces raw, untrimmed glyph bitmaps with lit ink.
pub trait GlyphSource {
    /// Returns `(symbol, bitmap)` pairs; the library trims and filters them.
    fn glyphs(&self) -> PeelResult<Vec<(char, Bitmap)>>;
}

/// In-memory glyph source.
#[derive(Clone, Debug, Default)]
pub struct GlyphMap {
    entries: Vec<(char, Bitmap)>,
}

impl GlyphMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a glyph; a later entry for the same symbol replaces earlier ones.
    pub fn insert(&mut self, symbol: char, bitmap: Bitmap) {
        self.entries.push((symbol, bitmap));
    }

    /// Builder-style [`GlyphMap::insert`].
    pub fn with(mut self, symbol: char, bitmap: Bitmap) -> Self {
        self.insert(symbol, bitmap);
        self
    }
}

impl FromIterator<(char, Bitmap)> for GlyphMap {
    fn from_iter<I: IntoIterator<Item = (char, Bitmap)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl GlyphSource for GlyphMap {
    fn glyphs(&self) -> PeelResult<Vec<(char, Bitmap)>> {
        Ok(self.entries.clone())
    }
}

/// Configuration for building a glyph library.
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    /// Symbols left out of the library.
    pub excluded: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED.to_string(),
        }
    }
}

/// A symbol with its canonical, ink-trimmed bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    symbol: char,
    bitmap: Bitmap,
}

impl Glyph {
    /// Returns the symbol.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Returns the trimmed bitmap (ink lit).
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

/// Read-only glyph library ordered by symbol.
#[derive(Clone, Debug)]
pub struct GlyphLibrary {
    glyphs: Vec<Glyph>,
}

impl GlyphLibrary {
    /// Builds a library from a glyph source, trimming every glyph and
    /// dropping excluded symbols.
    pub fn build(source: &dyn GlyphSource, cfg: &LibraryConfig) -> PeelResult<Self> {
        let mut by_symbol = BTreeMap::new();
        for (symbol, raw) in source.glyphs()? {
            if cfg.excluded.contains(symbol) {
                continue;
            }
            let bitmap = raw.auto_crop().map_err(|err| match err {
                PeelError::EmptyBitmap => PeelError::EmptyGlyph { symbol },
                other => other,
            })?;
            by_symbol.insert(symbol, bitmap);
        }
        if by_symbol.is_empty() {
            return Err(PeelError::EmptyLibrary);
        }
        let glyphs = by_symbol
            .into_iter()
            .map(|(symbol, bitmap)| Glyph { symbol, bitmap })
            .collect();
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns true if the library holds no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in ascending symbol order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.iter().map(|g| g.symbol)
    }

    /// Position of `symbol` in [`GlyphLibrary::glyphs`].
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.glyphs.binary_search_by(|g| g.symbol.cmp(&symbol)).ok()
    }

    /// Looks up the bitmap for `symbol`.
    pub fn get(&self, symbol: char) -> Option<&Bitmap> {
        self.index_of(symbol).map(|idx| &self.glyphs[idx].bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::{GlyphLibrary, GlyphMap, LibraryConfig};
    use crate::bitmap::Bitmap;
    use crate::util::PeelError;

    fn padded_bar() -> Bitmap {
        Bitmap::from_ascii(".....\n.##..\n.##..\n.....").unwrap()
    }

    #[test]
    fn build_trims_and_sorts() {
        let source = GlyphMap::new()
            .with('Z', padded_bar())
            .with('A', padded_bar());
        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        assert_eq!(library.symbols().collect::<String>(), "AZ");
        assert_eq!(library.get('A').unwrap().size(), (2, 2));
        assert_eq!(library.index_of('Z'), Some(1));
        assert!(library.get('Q').is_none());
    }

    #[test]
    fn build_skips_excluded_symbols() {
        let source = GlyphMap::new()
            .with('I', padded_bar())
            .with('L', padded_bar())
            .with('7', padded_bar());
        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        assert_eq!(library.symbols().collect::<String>(), "7");

        let only_excluded = GlyphMap::new().with('J', padded_bar());
        let err = GlyphLibrary::build(&only_excluded, &LibraryConfig::default()).unwrap_err();
        assert_eq!(err, PeelError::EmptyLibrary);
    }

    #[test]
    fn build_rejects_blank_glyphs() {
        let source = GlyphMap::new().with('Q', Bitmap::filled(4, 4, false).unwrap());
        let err = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap_err();
        assert_eq!(err, PeelError::EmptyGlyph { symbol: 'Q' });
    }
}

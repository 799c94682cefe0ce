//! Lazily populated cache of rotated, trimmed glyphs.
//!
//! The bank is sized up front for a fixed set of integer angles; each
//! `(glyph, angle)` slot is filled at most once and stored in a `OnceLock`,
//! so scoring jobs running on several threads can share it.

use crate::bitmap::Bitmap;
use crate::glyph::GlyphLibrary;
use crate::util::{PeelError, PeelResult};
use std::sync::OnceLock;

/// Rotated-glyph cache keyed by glyph index and angle.
pub struct RotationBank<'a> {
    library: &'a GlyphLibrary,
    angles: Vec<i32>,
    slots: Vec<Vec<OnceLock<Bitmap>>>,
}

impl<'a> RotationBank<'a> {
    /// Creates an empty bank covering `angles` for every glyph in `library`.
    pub fn new(library: &'a GlyphLibrary, angles: impl IntoIterator<Item = i32>) -> Self {
        let mut angles: Vec<i32> = angles.into_iter().collect();
        angles.sort_unstable();
        angles.dedup();
        let slots = (0..library.len())
            .map(|_| (0..angles.len()).map(|_| OnceLock::new()).collect())
            .collect();
        Self {
            library,
            angles,
            slots,
        }
    }

    /// Library the bank rotates glyphs from.
    pub fn library(&self) -> &'a GlyphLibrary {
        self.library
    }

    /// Angles the bank can serve, ascending.
    pub fn angles(&self) -> &[i32] {
        &self.angles
    }

    /// Number of slots already populated.
    pub fn cached(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Returns glyph `glyph_idx` rotated by `angle_deg`, trimmed and in
    /// captcha polarity, computing it on first use.
    pub fn rotated(&self, glyph_idx: usize, angle_deg: i32) -> PeelResult<&Bitmap> {
        let glyph = self
            .library
            .glyphs()
            .get(glyph_idx)
            .ok_or(PeelError::InvalidConfig("glyph index outside the library"))?;
        let slot = self
            .angles
            .binary_search(&angle_deg)
            .ok()
            .and_then(|angle_idx| self.slots[glyph_idx].get(angle_idx))
            .ok_or(PeelError::UnknownRotation {
                symbol: glyph.symbol(),
                angle_deg,
            })?;
        if let Some(rotated) = slot.get() {
            return Ok(rotated);
        }
        let rotated = glyph.bitmap().rotate_and_trim(angle_deg as f64)?;
        Ok(slot.get_or_init(|| rotated))
    }
}

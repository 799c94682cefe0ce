//! Scored glyph placements and deterministic selection among them.

use std::cmp::Ordering;

/// One scored placement of a rotated glyph on the working image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Fraction of mismatching pixels, lower is better.
    pub error: f64,
    /// Library symbol that was placed.
    pub symbol: char,
    /// Left column of the rotated glyph's footprint.
    pub x: usize,
    /// Top row of the rotated glyph's footprint.
    pub y: usize,
    /// Rotation in degrees, counter-clockwise.
    pub angle_deg: i32,
}

impl Candidate {
    /// Top-left corner of the footprint.
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// Picks the candidate with the strictly smallest error.
///
/// Ties keep the earliest candidate, so the result depends only on the
/// order the candidates are produced in.
pub fn select_best<I>(candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates.into_iter().fold(None, |best, cand| match best {
        Some(best) if cand.error.total_cmp(&best.error) != Ordering::Less => Some(best),
        _ => Some(cand),
    })
}

/// Sorts candidates into reading order by `(x, y)`; equal positions keep
/// their discovery order.
pub(crate) fn sort_by_position(candidates: &mut [Candidate]) {
    candidates.sort_by_key(Candidate::position);
}

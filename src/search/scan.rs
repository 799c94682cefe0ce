//! Exhaustive scoring of glyph placements inside the active zones.

use crate::bitmap::{Bitmap, Rect};
use crate::candidate::Candidate;
use crate::glyph::RotationBank;
use crate::util::PeelResult;
use crate::zone::SearchZone;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Step sizes for the placement sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanParams {
    /// Rotation step in degrees.
    pub angle_step_deg: usize,
    /// Horizontal step in pixels.
    pub x_step: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            angle_step_deg: 2,
            x_step: 1,
        }
    }
}

/// Row that vertically centers a `tpl_height` glyph, never negative.
pub fn centered_y(image_height: usize, tpl_height: usize) -> usize {
    image_height.saturating_sub(tpl_height) / 2
}

/// Mismatch between `tpl` and the same-size window of `image` at `(x, y)`.
///
/// Pixels of the window that fall outside the image count as unlit, so a
/// placement running off the right or bottom edge is still scored.
pub fn score_at(image: &Bitmap, tpl: &Bitmap, x: usize, y: usize) -> PeelResult<f64> {
    let window = image.window(Rect::new(x, y, tpl.width(), tpl.height()))?;
    tpl.mismatch_ratio(&window)
}

/// Scores one rotated glyph across a zone's x-band.
fn scan_rotation(
    image: &Bitmap,
    bank: &RotationBank<'_>,
    glyph_idx: usize,
    symbol: char,
    zone: &SearchZone,
    angle_deg: i32,
    x_step: usize,
) -> PeelResult<Vec<Candidate>> {
    let tpl = bank.rotated(glyph_idx, angle_deg)?;
    let y = centered_y(image.height(), tpl.height());
    zone.xs(x_step)
        .map(|x| {
            Ok(Candidate {
                error: score_at(image, tpl, x, y)?,
                symbol,
                x,
                y,
                angle_deg,
            })
        })
        .collect()
}

/// `(glyph, zone, angle)` triples in enumeration order.
fn jobs(
    glyph_count: usize,
    zones: &[SearchZone],
    angle_step_deg: usize,
) -> Vec<(usize, SearchZone, i32)> {
    let mut out = Vec::new();
    for glyph_idx in 0..glyph_count {
        for zone in zones {
            for angle in zone.angles(angle_step_deg) {
                out.push((glyph_idx, *zone, angle));
            }
        }
    }
    out
}

/// Scores every `(symbol, zone, angle, x)` placement.
///
/// Candidates come out ordered by symbol, then zone, then angle, then x.
pub fn scan_zones(
    image: &Bitmap,
    bank: &RotationBank<'_>,
    zones: &[SearchZone],
    params: ScanParams,
) -> PeelResult<Vec<Candidate>> {
    let glyphs = bank.library().glyphs();
    let mut out = Vec::new();
    for (glyph_idx, zone, angle) in jobs(glyphs.len(), zones, params.angle_step_deg) {
        let symbol = glyphs[glyph_idx].symbol();
        out.extend(scan_rotation(
            image,
            bank,
            glyph_idx,
            symbol,
            &zone,
            angle,
            params.x_step,
        )?);
    }
    Ok(out)
}

/// Parallel [`scan_zones`]; each `(symbol, zone, angle)` sweep is a job.
///
/// Results are gathered in job order, so the output equals the sequential
/// scan element for element.
#[cfg(feature = "rayon")]
pub fn scan_zones_par(
    image: &Bitmap,
    bank: &RotationBank<'_>,
    zones: &[SearchZone],
    params: ScanParams,
) -> PeelResult<Vec<Candidate>> {
    let glyphs = bank.library().glyphs();
    let results: Vec<PeelResult<Vec<Candidate>>> =
        jobs(glyphs.len(), zones, params.angle_step_deg)
            .into_par_iter()
            .map(|(glyph_idx, zone, angle)| {
                let symbol = glyphs[glyph_idx].symbol();
                scan_rotation(image, bank, glyph_idx, symbol, &zone, angle, params.x_step)
            })
            .collect();

    let mut out = Vec::new();
    for result in results {
        out.extend(result?);
    }
    Ok(out)
}

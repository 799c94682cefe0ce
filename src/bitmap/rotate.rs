//! Canvas-expanding rotation for two-level bitmaps.

use crate::bitmap::Bitmap;
use crate::util::math::{rotated_extent, sin_cos_deg};
use crate::util::PeelResult;

/// Rotates `src` counter-clockwise by `angle_deg` about its center.
///
/// The output canvas is enlarged to the bounding box of the rotated input
/// so no content is clipped. Each destination pixel center is mapped back to
/// the source with the inverse rotation and sampled with nearest-neighbour;
/// samples that land outside the source are unlit. A zero angle reproduces
/// the input exactly.
pub fn rotate_expand(src: &Bitmap, angle_deg: f64) -> Bitmap {
    let (width, height) = src.size();
    let (out_w, out_h) = rotated_extent(width, height, angle_deg);
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);

    let cx = width as f64 * 0.5;
    let cy = height as f64 * 0.5;
    let ocx = out_w as f64 * 0.5;
    let ocy = out_h as f64 * 0.5;

    let mut out = vec![false; out_w * out_h];
    for y in 0..out_h {
        let dy = y as f64 + 0.5 - ocy;
        for x in 0..out_w {
            let dx = x as f64 + 0.5 - ocx;
            // y points down, so a visual counter-clockwise turn flips the sin terms.
            let src_x = (cos_a * dx - sin_a * dy + cx).floor();
            let src_y = (sin_a * dx + cos_a * dy + cy).floor();
            if src_x < 0.0 || src_y < 0.0 {
                continue;
            }
            if let Some(lit) = src.get(src_x as usize, src_y as usize) {
                out[y * out_w + x] = lit;
            }
        }
    }

    Bitmap {
        data: out,
        width: out_w,
        height: out_h,
    }
}

impl Bitmap {
    /// Rotates a glyph, trims it to its ink and flips it into captcha polarity.
    ///
    /// The input carries ink as lit pixels. The result has the ink unlit on a
    /// lit background, ready to be scored against a working image.
    pub fn rotate_and_trim(&self, angle_deg: f64) -> PeelResult<Bitmap> {
        Ok(rotate_expand(self, angle_deg).auto_crop()?.invert())
    }
}

//! Two-level bitmaps and the pixel algebra used by the decoder.
//!
//! A pixel is either *lit* (the source luminance was nonzero) or *unlit*.
//! Glyph bitmaps carry ink as lit pixels so that auto-cropping trims to the
//! ink; captcha images carry ink as unlit pixels on a lit background.
//! [`Bitmap::rotate_and_trim`] moves a glyph from the first convention to the
//! second. Every transformation returns a new owned bitmap.

use crate::util::{PeelError, PeelResult};

pub(crate) mod rotate;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }
}

/// Owned, contiguous two-level image.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    data: Vec<bool>,
    width: usize,
    height: usize,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &self.lit_count())
            .finish()
    }
}

impl Bitmap {
    /// Creates a bitmap from row-major pixels (`true` = lit).
    pub fn new(data: Vec<bool>, width: usize, height: usize) -> PeelResult<Self> {
        let needed = checked_area(width, height)?;
        if data.len() != needed {
            return Err(PeelError::BufferLength {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a bitmap with every pixel set to `lit`.
    pub fn filled(width: usize, height: usize, lit: bool) -> PeelResult<Self> {
        let needed = checked_area(width, height)?;
        Ok(Self {
            data: vec![lit; needed],
            width,
            height,
        })
    }

    /// Binarizes an 8-bit luminance buffer: zero is unlit, anything else is lit.
    pub fn binarize(luma: &[u8], width: usize, height: usize) -> PeelResult<Self> {
        let needed = checked_area(width, height)?;
        if luma.len() != needed {
            return Err(PeelError::BufferLength {
                needed,
                got: luma.len(),
            });
        }
        let data = luma.iter().map(|&v| v != 0).collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Parses an ASCII picture: `#` or `*` is lit, anything else unlit.
    ///
    /// Rows are separated by newlines and must all have the same length.
    pub fn from_ascii(art: &str) -> PeelResult<Self> {
        let rows: Vec<&str> = art.lines().filter(|line| !line.is_empty()).collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut data = Vec::with_capacity(width * height);
        for row in &rows {
            if row.chars().count() != width {
                return Err(PeelError::InvalidDimensions { width, height });
            }
            data.extend(row.chars().map(|c| c == '#' || c == '*'));
        }
        Self::new(data, width, height)
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the row-major pixel buffer.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Sets the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, lit: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = lit;
        }
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&[bool]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.data.iter().filter(|&&lit| lit).count()
    }

    /// Returns the part of `rect` that overlaps this bitmap as a new bitmap.
    ///
    /// The result is smaller than `rect` when the rectangle runs past the
    /// right or bottom edge.
    pub fn crop(&self, rect: Rect) -> PeelResult<Bitmap> {
        let right = rect.right().min(self.width);
        let bottom = rect.bottom().min(self.height);
        if rect.x >= right || rect.y >= bottom {
            return Err(PeelError::EmptyCrop {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                img_width: self.width,
                img_height: self.height,
            });
        }
        let width = right - rect.x;
        let height = bottom - rect.y;
        let mut data = Vec::with_capacity(width * height);
        for y in rect.y..bottom {
            let start = y * self.width + rect.x;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Ok(Bitmap {
            data,
            width,
            height,
        })
    }

    /// Returns a `rect`-sized copy of this bitmap; pixels past the right or
    /// bottom edge are unlit.
    pub fn window(&self, rect: Rect) -> PeelResult<Bitmap> {
        let mut out = Bitmap::filled(rect.width, rect.height, false)?;
        let cols = rect.width.min(self.width.saturating_sub(rect.x));
        let rows = if cols == 0 {
            0
        } else {
            rect.height.min(self.height.saturating_sub(rect.y))
        };
        for y in 0..rows {
            let start = (rect.y + y) * self.width + rect.x;
            out.data[y * rect.width..y * rect.width + cols]
                .copy_from_slice(&self.data[start..start + cols]);
        }
        Ok(out)
    }

    /// Tightest rectangle containing every lit pixel, or `None` if nothing is lit.
    pub fn content_bounds(&self) -> Option<Rect> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        let mut any = false;
        for (y, row) in self.data.chunks_exact(self.width).enumerate() {
            let Some(first) = row.iter().position(|&lit| lit) else {
                continue;
            };
            let last = row.iter().rposition(|&lit| lit).unwrap_or(first);
            any = true;
            min_x = min_x.min(first);
            max_x = max_x.max(last);
            min_y = min_y.min(y);
            max_y = y;
        }
        any.then(|| Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Crops to [`Bitmap::content_bounds`].
    pub fn auto_crop(&self) -> PeelResult<Bitmap> {
        let bounds = self.content_bounds().ok_or(PeelError::EmptyBitmap)?;
        self.crop(bounds)
    }

    /// Swaps lit and unlit pixels.
    pub fn invert(&self) -> Bitmap {
        Bitmap {
            data: self.data.iter().map(|&lit| !lit).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Fraction of positions where `self` and `other` disagree, in `[0, 1]`.
    pub fn mismatch_ratio(&self, other: &Bitmap) -> PeelResult<f64> {
        if self.size() != other.size() {
            return Err(PeelError::SizeMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        let diff = self
            .data
            .iter()
            .zip(&other.data)
            .filter(|(a, b)| a != b)
            .count();
        Ok(diff as f64 / self.data.len() as f64)
    }

    /// Erases `overlay` from this bitmap at `offset`.
    ///
    /// Under the overlay footprint (clipped to this bitmap) a pixel becomes
    /// lit where the base and overlay values are equal and unlit otherwise.
    /// Pixels outside the footprint are copied unchanged. Applying the same
    /// overlay twice restores the footprint.
    pub fn xor_subtract(&self, overlay: &Bitmap, offset: (usize, usize)) -> Bitmap {
        let mut out = self.clone();
        let (ox, oy) = offset;
        let cols = overlay.width.min(self.width.saturating_sub(ox));
        let rows = overlay.height.min(self.height.saturating_sub(oy));
        for y in 0..rows {
            let base_row = (oy + y) * self.width + ox;
            let over_row = y * overlay.width;
            for x in 0..cols {
                out.data[base_row + x] = self.data[base_row + x] == overlay.data[over_row + x];
            }
        }
        out
    }

    /// Renders the bitmap as text, `*` for unlit pixels and a space for lit ones.
    ///
    /// Only every `step`-th column and row is sampled; a step of zero is
    /// treated as one.
    pub fn render_ascii(&self, step: usize) -> String {
        let step = step.max(1);
        let mut out = String::with_capacity((self.width / step + 1) * (self.height / step + 1));
        for y in (0..self.height).step_by(step) {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            for &lit in row.iter().step_by(step) {
                out.push(if lit { ' ' } else { '*' });
            }
            out.push('\n');
        }
        out
    }
}

fn checked_area(width: usize, height: usize) -> PeelResult<usize> {
    if width == 0 || height == 0 {
        return Err(PeelError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(PeelError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{Bitmap, Rect};
    use crate::util::PeelError;

    fn sample() -> Bitmap {
        Bitmap::from_ascii(
            "\
......
..##..
..#...
......",
        )
        .unwrap()
    }

    #[test]
    fn binarize_maps_zero_to_unlit() {
        let bmp = Bitmap::binarize(&[0, 1, 255, 0], 2, 2).unwrap();
        assert_eq!(bmp.as_slice(), &[false, true, true, false]);
        let err = Bitmap::binarize(&[0, 1, 2], 2, 2).unwrap_err();
        assert_eq!(err, PeelError::BufferLength { needed: 4, got: 3 });
    }

    #[test]
    fn crop_clips_to_bounds() {
        let bmp = sample();
        let crop = bmp.crop(Rect::new(4, 2, 10, 10)).unwrap();
        assert_eq!(crop.size(), (2, 2));
        let err = bmp.crop(Rect::new(6, 0, 2, 2)).unwrap_err();
        assert!(matches!(err, PeelError::EmptyCrop { .. }));
    }

    #[test]
    fn window_pads_past_the_edges_with_unlit() {
        let bmp = Bitmap::from_ascii("###\n#.#").unwrap();
        let inside = bmp.window(Rect::new(1, 0, 2, 2)).unwrap();
        assert_eq!(inside, bmp.crop(Rect::new(1, 0, 2, 2)).unwrap());

        let padded = bmp.window(Rect::new(2, 1, 3, 2)).unwrap();
        assert_eq!(padded.size(), (3, 2));
        assert_eq!(padded.as_slice(), &[true, false, false, false, false, false]);

        let outside = bmp.window(Rect::new(7, 5, 2, 1)).unwrap();
        assert_eq!(outside.lit_count(), 0);
        let right_of = bmp.window(Rect::new(5, 0, 2, 2)).unwrap();
        assert_eq!(right_of.lit_count(), 0);
    }

    #[test]
    fn content_bounds_finds_ink() {
        let bmp = sample();
        assert_eq!(bmp.content_bounds(), Some(Rect::new(2, 1, 2, 2)));
        let trimmed = bmp.auto_crop().unwrap();
        assert_eq!(trimmed.as_slice(), &[true, true, true, false]);
    }

    #[test]
    fn auto_crop_rejects_blank_bitmap() {
        let blank = Bitmap::filled(3, 3, false).unwrap();
        assert_eq!(blank.content_bounds(), None);
        assert_eq!(blank.auto_crop().unwrap_err(), PeelError::EmptyBitmap);
    }

    #[test]
    fn mismatch_ratio_counts_disagreements() {
        let a = Bitmap::new(vec![true, true, false, false], 2, 2).unwrap();
        let b = Bitmap::new(vec![true, false, false, true], 2, 2).unwrap();
        assert_eq!(a.mismatch_ratio(&b).unwrap(), 0.5);
        let c = Bitmap::filled(1, 4, true).unwrap();
        assert!(matches!(
            a.mismatch_ratio(&c),
            Err(PeelError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn xor_subtract_erases_matching_ink() {
        let base = Bitmap::from_ascii("####\n#..#\n####").unwrap();
        let overlay = Bitmap::from_ascii("..\n..").unwrap();
        let erased = base.xor_subtract(&overlay, (1, 1));
        assert_eq!(erased.get(1, 1), Some(true));
        assert_eq!(erased.get(2, 1), Some(true));
        // Overlay ink over base background turns unlit.
        assert_eq!(erased.get(1, 2), Some(false));
        assert_eq!(erased.get(0, 0), Some(true));
    }

    #[test]
    fn xor_subtract_clips_overlay_at_edges() {
        let base = Bitmap::filled(3, 3, true).unwrap();
        let overlay = Bitmap::filled(4, 4, false).unwrap();
        let out = base.xor_subtract(&overlay, (2, 2));
        assert_eq!(out.size(), (3, 3));
        assert_eq!(out.get(2, 2), Some(false));
        assert_eq!(out.lit_count(), 8);
    }

    #[test]
    fn render_ascii_marks_unlit_pixels() {
        let bmp = Bitmap::from_ascii("#.\n.#").unwrap();
        assert_eq!(bmp.render_ascii(1), " *\n* \n");
        assert_eq!(bmp.render_ascii(2), " \n");
    }
}

//! peelmatch decodes rotated-glyph captchas by greedy template peeling.
//!
//! A binarized captcha is compared against a library of glyph bitmaps under
//! every rotation and position allowed by a set of per-character search
//! zones. The best placement is committed, its footprint is erased from the
//! working image, and the search repeats until every character is found.
//! Scoring can run on rayon with the `rayon` feature. Image loading lives
//! behind `image-io` and font rendering behind `font`.

pub mod bitmap;
mod candidate;
pub mod glyph;
#[cfg(feature = "image-io")]
pub mod io;
pub mod lowlevel;
pub mod report;
pub mod search;
mod trace;
pub mod util;
pub mod zone;

pub use bitmap::{Bitmap, Rect};
pub use candidate::Candidate;
#[cfg(feature = "font")]
pub use glyph::FontGlyphs;
pub use glyph::{Glyph, GlyphLibrary, GlyphMap, GlyphSheet, GlyphSource, LibraryConfig, SheetLayout};
pub use report::{QuietReporter, Reporter, TextReporter};
pub use search::{DecodeConfig, DecodeResult, DecodeSession, DecodeState, Decoder};
pub use util::{PeelError, PeelResult};
pub use zone::{AngleSign, SearchZone, ZoneLayout, ZonePruning, ZoneSet};

//! Building blocks for custom decode loops.
//!
//! Most users should go through [`crate::Decoder`]. These items expose the
//! rotation cache, the placement scorer and the raw rotation primitive for
//! callers that want to drive the search themselves.

pub use crate::bitmap::rotate::rotate_expand;
pub use crate::candidate::select_best;
pub use crate::glyph::RotationBank;
#[cfg(feature = "rayon")]
pub use crate::search::scan::scan_zones_par;
pub use crate::search::scan::{centered_y, scan_zones, score_at, ScanParams};

//! Error types for peelmatch.

use thiserror::Error;

/// Result alias for peelmatch operations.
pub type PeelResult<T> = std::result::Result<T, PeelError>;

/// Errors that can occur while building glyph libraries or decoding images.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PeelError {
    /// Width or height is zero, or the buffer does not match the dimensions.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Pixel buffer length does not match `width * height`.
    #[error("buffer length mismatch: needed {needed}, got {got}")]
    BufferLength { needed: usize, got: usize },
    /// Two bitmaps compared by the mismatch metric differ in size.
    #[error("size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// Auto-crop was requested on a bitmap without any lit pixel.
    #[error("bitmap has no lit pixels")]
    EmptyBitmap,
    /// The crop rectangle does not overlap the bitmap.
    #[error("crop at ({x}, {y}) size {width}x{height} is outside a {img_width}x{img_height} bitmap")]
    EmptyCrop {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A glyph source produced a glyph without ink.
    #[error("glyph {symbol:?} is empty")]
    EmptyGlyph { symbol: char },
    /// No glyph survived the exclusion list.
    #[error("glyph library is empty")]
    EmptyLibrary,
    /// A rotation was requested that the bank was not built for.
    #[error("no rotation slot for glyph {symbol:?} at {angle_deg} degrees")]
    UnknownRotation { symbol: char, angle_deg: i32 },
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// An iteration had no open zone to search.
    #[error("no open zones left in iteration {iteration}")]
    NoCandidates { iteration: usize },
    /// A decode session was finalized before all characters were found.
    #[error("decode incomplete: found {found} of {expected} characters")]
    Incomplete { found: usize, expected: usize },
    /// Image decoding or file access failed.
    #[error("image I/O error: {reason}")]
    ImageIo { reason: String },
    /// A font could not be read, parsed or rendered.
    #[error("font error: {reason}")]
    Font { reason: String },
}

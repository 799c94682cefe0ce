//! Progress reporting for decode runs.
//!
//! The decoder never prints. It hands progress to a [`Reporter`] supplied by
//! the caller; [`QuietReporter`] discards everything and [`TextReporter`]
//! writes human-readable progress with ASCII renderings of the image.

use crate::bitmap::Bitmap;
use crate::candidate::Candidate;
use crate::search::DecodeResult;
use std::io::Write;

/// Receives decode progress. Every method defaults to a no-op.
pub trait Reporter {
    /// Called once with the binarized target before the first iteration.
    fn start(&mut self, _image: &Bitmap) {}

    /// Called at the start of iteration `index` (1-based) of `total`.
    fn iteration(&mut self, _index: usize, _total: usize) {}

    /// Called with the candidate accepted by the current iteration.
    fn accepted(&mut self, _candidate: &Candidate) {}

    /// Called with the working image after the accepted glyph was erased.
    fn working_image(&mut self, _image: &Bitmap) {}

    /// Called once with the final result.
    fn finished(&mut self, _result: &DecodeResult) {}
}

/// Reporter that ignores all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuietReporter;

impl Reporter for QuietReporter {}

/// Writes progress lines and ASCII art to any `Write` sink.
///
/// Write failures are swallowed: reporting must never change the outcome
/// of a decode.
pub struct TextReporter<W: Write> {
    out: W,
    image_step: usize,
    show_working: bool,
}

impl<W: Write> TextReporter<W> {
    /// Creates a reporter that renders the target image at every second pixel.
    pub fn new(out: W) -> Self {
        Self {
            out,
            image_step: 2,
            show_working: false,
        }
    }

    /// Sets the pixel step used when rendering images.
    pub fn with_image_step(mut self, step: usize) -> Self {
        self.image_step = step.max(1);
        self
    }

    /// Also renders the working image after each erase.
    pub fn with_working_images(mut self, show: bool) -> Self {
        self.show_working = show;
        self
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn start(&mut self, image: &Bitmap) {
        let _ = write!(self.out, "{}", image.render_ascii(self.image_step));
    }

    fn iteration(&mut self, index: usize, total: usize) {
        let _ = write!(self.out, "iteration {index}/{total} ");
    }

    fn accepted(&mut self, c: &Candidate) {
        let _ = writeln!(
            self.out,
            "({:.6}, '{}', ({}, {}), {})",
            c.error, c.symbol, c.x, c.y, c.angle_deg
        );
    }

    fn working_image(&mut self, image: &Bitmap) {
        if self.show_working {
            let _ = write!(self.out, "{}", image.render_ascii(self.image_step));
        }
    }

    fn finished(&mut self, result: &DecodeResult) {
        let _ = writeln!(self.out, "({:.6}, '{}')", result.mean_error, result.text);
        let _ = self.out.flush();
    }
}

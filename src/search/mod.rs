//! Greedy decoding of a captcha bitmap against a glyph library.
//!
//! Each iteration scores every glyph placement in the active zones, commits
//! to the single best one, closes the zone it fell in and erases the glyph
//! from the working image. The search never backtracks: it is knowingly
//! not globally optimal, and ambiguous inputs decode to whatever the greedy
//! order finds first.

pub(crate) mod scan;
mod session;

pub use scan::ScanParams;
pub use session::{DecodeSession, DecodeState};

use crate::bitmap::Bitmap;
use crate::candidate::Candidate;
use crate::glyph::GlyphLibrary;
use crate::report::{QuietReporter, Reporter};
use crate::trace::{trace_event, trace_span};
use crate::util::{PeelError, PeelResult};
use crate::zone::{ZoneLayout, ZonePruning, ZoneSet};

/// Decoder configuration.
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    /// Number of characters in the captcha.
    pub captcha_len: usize,
    /// Rotation step in degrees within each zone's angle band.
    pub angle_step_deg: usize,
    /// Horizontal step in pixels within each zone's x-band.
    pub x_step: usize,
    /// Zone pruning rule.
    pub pruning: ZonePruning,
    /// Score placements with rayon when the `rayon` feature is enabled.
    pub parallel: bool,
    /// Slot layout used to derive zones from the image width.
    pub layout: ZoneLayout,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            captcha_len: 4,
            angle_step_deg: 2,
            x_step: 1,
            pruning: ZonePruning::AfterFirstMatch,
            parallel: false,
            layout: ZoneLayout::default(),
        }
    }
}

impl DecodeConfig {
    fn validate(&self) -> PeelResult<()> {
        if self.captcha_len == 0 {
            return Err(PeelError::InvalidConfig("captcha_len must be > 0"));
        }
        if self.angle_step_deg == 0 {
            return Err(PeelError::InvalidConfig("angle_step_deg must be > 0"));
        }
        if self.x_step == 0 {
            return Err(PeelError::InvalidConfig("x_step must be > 0"));
        }
        Ok(())
    }

    pub(crate) fn scan_params(&self) -> ScanParams {
        ScanParams {
            angle_step_deg: self.angle_step_deg,
            x_step: self.x_step,
        }
    }
}

/// Outcome of a full decode.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeResult {
    /// Accepted candidates in reading order (ascending x, then y).
    pub matches: Vec<Candidate>,
    /// Mean mismatch ratio over all accepted candidates.
    pub mean_error: f64,
    /// Upper-cased symbols in reading order.
    pub text: String,
}

impl DecodeResult {
    pub(crate) fn from_matches(mut matches: Vec<Candidate>) -> Self {
        crate::candidate::sort_by_position(&mut matches);
        let mean_error = if matches.is_empty() {
            0.0
        } else {
            matches.iter().map(|c| c.error).sum::<f64>() / matches.len() as f64
        };
        let text = matches
            .iter()
            .flat_map(|c| c.symbol.to_uppercase())
            .collect();
        Self {
            matches,
            mean_error,
            text,
        }
    }
}

/// Greedy captcha decoder over a fixed glyph library.
pub struct Decoder {
    library: GlyphLibrary,
    cfg: DecodeConfig,
}

impl Decoder {
    /// Creates a decoder with the default configuration.
    pub fn new(library: GlyphLibrary) -> Self {
        Self {
            library,
            cfg: DecodeConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: DecodeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.cfg
    }

    /// Returns the glyph library.
    pub fn library(&self) -> &GlyphLibrary {
        &self.library
    }

    /// Starts a step-wise decode with zones derived from the image width.
    pub fn session(&self, image: &Bitmap) -> PeelResult<DecodeSession<'_>> {
        let zones = self.cfg.layout.build(image.width())?;
        self.session_with_zones(image, zones)
    }

    /// Starts a step-wise decode over caller-supplied zones.
    ///
    /// Each accepted character closes one zone, so there must be at least
    /// `captcha_len` of them.
    pub fn session_with_zones(
        &self,
        image: &Bitmap,
        zones: ZoneSet,
    ) -> PeelResult<DecodeSession<'_>> {
        self.cfg.validate()?;
        if zones.len() < self.cfg.captcha_len {
            return Err(PeelError::InvalidConfig("captcha_len exceeds the number of search zones"));
        }
        Ok(DecodeSession::new(&self.library, &self.cfg, image.clone(), zones))
    }

    /// Decodes `image` without reporting.
    pub fn decode(&self, image: &Bitmap) -> PeelResult<DecodeResult> {
        self.decode_with(image, &mut QuietReporter)
    }

    /// Decodes `image`, sending progress to `reporter`.
    pub fn decode_with(
        &self,
        image: &Bitmap,
        reporter: &mut dyn Reporter,
    ) -> PeelResult<DecodeResult> {
        let _span = trace_span!(
            "decode",
            width = image.width(),
            height = image.height(),
            glyphs = self.library.len()
        )
        .entered();

        let mut session = self.session(image)?;
        reporter.start(image);
        while !session.is_done() {
            reporter.iteration(session.found().len() + 1, self.cfg.captcha_len);
            if let Some(candidate) = session.step()? {
                reporter.accepted(&candidate);
                reporter.working_image(session.working());
            }
        }
        let result = session.finish()?;
        trace_event!(
            "decode_finished",
            text = result.text.as_str(),
            mean_error = result.mean_error
        );
        reporter.finished(&result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeConfig, DecodeResult, Decoder};
    use crate::bitmap::Bitmap;
    use crate::candidate::Candidate;
    use crate::glyph::{GlyphLibrary, GlyphMap, LibraryConfig};
    use crate::util::PeelError;

    fn cand(error: f64, symbol: char, x: usize) -> Candidate {
        Candidate {
            error,
            symbol,
            x,
            y: 0,
            angle_deg: 0,
        }
    }

    #[test]
    fn result_sorts_and_uppercases() {
        let result = DecodeResult::from_matches(vec![
            cand(0.2, 'b', 50),
            cand(0.0, 'a', 10),
            cand(0.1, '7', 30),
            cand(0.1, 'x', 90),
        ]);
        assert_eq!(result.text, "A7BX");
        assert!((result.mean_error - 0.1).abs() < 1e-12);
        assert_eq!(result.matches[0].x, 10);
    }

    #[test]
    fn decode_rejects_zero_steps() {
        let source = GlyphMap::new().with('A', Bitmap::filled(2, 2, true).unwrap());
        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        let decoder = Decoder::new(library).with_config(DecodeConfig {
            angle_step_deg: 0,
            ..DecodeConfig::default()
        });
        let image = Bitmap::filled(40, 20, true).unwrap();
        let err = decoder.decode(&image).unwrap_err();
        assert_eq!(err, PeelError::InvalidConfig("angle_step_deg must be > 0"));
    }

    #[test]
    fn decode_rejects_more_characters_than_zones() {
        let source = GlyphMap::new().with('A', Bitmap::filled(2, 2, true).unwrap());
        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        let decoder = Decoder::new(library).with_config(DecodeConfig {
            captcha_len: 5,
            ..DecodeConfig::default()
        });
        let image = Bitmap::filled(160, 40, true).unwrap();
        let err = decoder.decode(&image).unwrap_err();
        assert_eq!(
            err,
            PeelError::InvalidConfig("captcha_len exceeds the number of search zones")
        );
    }
}

//! Step-wise greedy decode state.

use crate::bitmap::Bitmap;
use crate::candidate::{select_best, Candidate};
use crate::glyph::{GlyphLibrary, RotationBank};
#[cfg(feature = "rayon")]
use crate::search::scan::scan_zones_par;
use crate::search::scan::scan_zones;
use crate::search::{DecodeConfig, DecodeResult};
use crate::trace::{trace_debug, trace_span};
use crate::util::{PeelError, PeelResult};
use crate::zone::{SearchZone, ZoneSet};

/// Where a session stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeState {
    /// Fewer than `captcha_len` characters found so far.
    Searching { found: usize },
    /// Every character has been found.
    Done,
}

/// One decode in progress: the working image, the open zones and the
/// matches accepted so far. Owned exclusively by its caller.
pub struct DecodeSession<'a> {
    cfg: &'a DecodeConfig,
    bank: RotationBank<'a>,
    working: Bitmap,
    zones: ZoneSet,
    found: Vec<Candidate>,
}

impl<'a> DecodeSession<'a> {
    pub(crate) fn new(
        library: &'a GlyphLibrary,
        cfg: &'a DecodeConfig,
        image: Bitmap,
        zones: ZoneSet,
    ) -> Self {
        let bank = RotationBank::new(library, zones.angles(cfg.angle_step_deg));
        Self {
            cfg,
            bank,
            working: image,
            zones,
            found: Vec::with_capacity(cfg.captcha_len),
        }
    }

    /// Current state.
    pub fn state(&self) -> DecodeState {
        if self.is_done() {
            DecodeState::Done
        } else {
            DecodeState::Searching {
                found: self.found.len(),
            }
        }
    }

    /// Returns true once `captcha_len` characters have been accepted.
    pub fn is_done(&self) -> bool {
        self.found.len() >= self.cfg.captcha_len
    }

    /// Working image with every accepted glyph erased.
    pub fn working(&self) -> &Bitmap {
        &self.working
    }

    /// Zones still open.
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Accepted candidates in discovery order.
    pub fn found(&self) -> &[Candidate] {
        &self.found
    }

    /// Runs one greedy iteration and returns the accepted candidate, or
    /// `None` if the session was already done.
    pub fn step(&mut self) -> PeelResult<Option<Candidate>> {
        if self.is_done() {
            return Ok(None);
        }
        let iteration = self.found.len() + 1;
        let active = self.zones.active(self.cfg.pruning);
        let _span = trace_span!(
            "decode_iteration",
            iteration = iteration,
            zones = active.len()
        )
        .entered();

        let candidates = self.scan(&active)?;
        trace_debug!("candidates_scored", iteration = iteration, count = candidates.len());
        let best = select_best(candidates).ok_or(PeelError::NoCandidates { iteration })?;
        trace_debug!(
            "candidate_accepted",
            symbol = best.symbol.to_string().as_str(),
            error = best.error,
            x = best.x,
            y = best.y,
            angle_deg = best.angle_deg
        );
        self.found.push(best);

        if let Some(idx) = self.zones.zone_containing(best.x) {
            self.zones.remove(idx);
            trace_debug!("zone_removed", index = idx, remaining = self.zones.len());
        }

        let glyph_idx = self
            .bank
            .library()
            .index_of(best.symbol)
            .ok_or(PeelError::InvalidConfig("accepted symbol missing from library"))?;
        let tpl = self.bank.rotated(glyph_idx, best.angle_deg)?;
        self.working = self.working.xor_subtract(tpl, best.position());
        Ok(Some(best))
    }

    fn scan(&self, active: &[SearchZone]) -> PeelResult<Vec<Candidate>> {
        let params = self.cfg.scan_params();
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return scan_zones_par(&self.working, &self.bank, active, params);
        }
        scan_zones(&self.working, &self.bank, active, params)
    }

    /// Orders the accepted candidates by position and builds the result.
    pub fn finish(self) -> PeelResult<DecodeResult> {
        if !self.is_done() {
            return Err(PeelError::Incomplete {
                found: self.found.len(),
                expected: self.cfg.captcha_len,
            });
        }
        Ok(DecodeResult::from_matches(self.found))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeSession, DecodeState};
    use crate::bitmap::Bitmap;
    use crate::glyph::{GlyphLibrary, GlyphMap, LibraryConfig};
    use crate::search::{DecodeConfig, Decoder};
    use crate::util::PeelError;
    use crate::zone::{SearchZone, ZoneSet};

    fn decoder() -> Decoder {
        let block = Bitmap::from_ascii("###\n#.#\n###").unwrap();
        let source = GlyphMap::new().with('O', block);
        let library = GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap();
        Decoder::new(library).with_config(DecodeConfig {
            captcha_len: 2,
            ..DecodeConfig::default()
        })
    }

    #[test]
    fn session_walks_states_and_shrinks_zones() {
        let decoder = decoder();
        let mut image = Bitmap::filled(12, 5, true).unwrap();
        for (x, y) in [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)] {
            image.set(x, y, false);
        }
        let zones = ZoneSet::new(vec![
            SearchZone::new(0..=2, 0..=0),
            SearchZone::new(6..=8, 0..=0),
        ]);
        let mut session = decoder.session_with_zones(&image, zones).unwrap();
        assert_eq!(session.state(), DecodeState::Searching { found: 0 });

        let first = session.step().unwrap().unwrap();
        assert_eq!((first.x, first.y, first.error), (1, 1, 0.0));
        assert_eq!(session.zones().len(), 1);
        assert_eq!(session.working().lit_count(), 60);

        let err = DecodeSession::new(
            decoder.library(),
            decoder.config(),
            image.clone(),
            ZoneSet::new(Vec::new()),
        )
        .step()
        .unwrap_err();
        assert_eq!(err, PeelError::NoCandidates { iteration: 1 });
        let err = decoder
            .session_with_zones(&image, ZoneSet::new(Vec::new()))
            .err();
        assert!(matches!(err, Some(PeelError::InvalidConfig(_))));

        session.step().unwrap().unwrap();
        assert_eq!(session.state(), DecodeState::Done);
        assert!(session.step().unwrap().is_none());
        let result = session.finish().unwrap();
        assert_eq!(result.text, "OO");
    }

    #[test]
    fn finish_before_done_is_incomplete() {
        let decoder = decoder();
        let image = Bitmap::filled(12, 5, true).unwrap();
        let session = decoder.session(&image).unwrap();
        let err = session.finish().unwrap_err();
        assert_eq!(
            err,
            PeelError::Incomplete {
                found: 0,
                expected: 2
            }
        );
    }
}

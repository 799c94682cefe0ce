//! Default slot layout for four-character rotated captchas.

use crate::util::{PeelError, PeelResult};
use crate::zone::{SearchZone, ZoneSet};

/// Rotation direction of a slot's angle band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleSign {
    /// Clockwise band, e.g. `-30..=-15`.
    Negative,
    /// Counter-clockwise band, e.g. `15..=30`.
    Positive,
}

impl AngleSign {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            AngleSign::Negative => AngleSign::Positive,
            AngleSign::Positive => AngleSign::Negative,
        }
    }
}

/// Parameters that turn an image width into a [`ZoneSet`].
///
/// Slot 0 uses `first_x_band` verbatim. Slot `k > 0` is centered at
/// `k * width / slots` and extends `half_width` pixels either side, with
/// bounds truncated toward zero and clamped at zero. Angle bands alternate
/// sign slot by slot starting with `first_sign`; the characters of this
/// captcha family lean alternately left and right.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneLayout {
    /// Number of character slots.
    pub slots: usize,
    /// Inclusive x-band of the leftmost slot.
    pub first_x_band: (usize, usize),
    /// Half width of every other slot's x-band.
    pub half_width: f64,
    /// Rotation magnitude band, `min <= max`, both non-negative.
    pub angle_band: (i32, i32),
    /// Direction of slot 0.
    pub first_sign: AngleSign,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            slots: 4,
            first_x_band: (0, 5),
            half_width: 10.0,
            angle_band: (15, 30),
            first_sign: AngleSign::Negative,
        }
    }
}

impl ZoneLayout {
    /// Builds the zones for an image `width` pixels wide.
    pub fn build(&self, width: usize) -> PeelResult<ZoneSet> {
        if self.slots == 0 {
            return Err(PeelError::InvalidConfig("zone layout needs at least one slot"));
        }
        let (lo, hi) = self.angle_band;
        if lo < 0 || hi < lo {
            return Err(PeelError::InvalidConfig(
                "angle band must be non-negative and ordered",
            ));
        }
        if self.first_x_band.1 < self.first_x_band.0 || self.half_width < 0.0 {
            return Err(PeelError::InvalidConfig("x-band must be ordered"));
        }

        let mut sign = self.first_sign;
        let mut zones = Vec::with_capacity(self.slots);
        for slot in 0..self.slots {
            let (x_min, x_max) = if slot == 0 {
                self.first_x_band
            } else {
                let center = slot as f64 * width as f64 / self.slots as f64;
                (
                    truncate_at_zero(center - self.half_width),
                    truncate_at_zero(center + self.half_width),
                )
            };
            let angles = match sign {
                AngleSign::Negative => -hi..=-lo,
                AngleSign::Positive => lo..=hi,
            };
            zones.push(SearchZone::new(x_min..=x_max, angles));
            sign = sign.flip();
        }
        Ok(ZoneSet::new(zones))
    }
}

fn truncate_at_zero(value: f64) -> usize {
    value.trunc().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::{AngleSign, ZoneLayout};
    use crate::zone::SearchZone;

    #[test]
    fn default_layout_matches_four_slot_format() {
        let zones = ZoneLayout::default().build(160).unwrap();
        assert_eq!(
            zones.zones(),
            &[
                SearchZone::new(0..=5, -30..=-15),
                SearchZone::new(30..=50, 15..=30),
                SearchZone::new(70..=90, -30..=-15),
                SearchZone::new(110..=130, 15..=30),
            ]
        );
    }

    #[test]
    fn bands_truncate_and_clamp() {
        let zones = ZoneLayout::default().build(30).unwrap();
        // 30 / 4 = 7.5, so the band is 7.5 - 10 -> 0 and 7.5 + 10 -> 17.
        assert_eq!(zones.zones()[1].x_min, 0);
        assert_eq!(zones.zones()[1].x_max, 17);
    }

    #[test]
    fn signs_alternate_from_first_sign() {
        let layout = ZoneLayout {
            slots: 3,
            first_sign: AngleSign::Positive,
            ..ZoneLayout::default()
        };
        let zones = layout.build(90).unwrap();
        let signs: Vec<bool> = zones.zones().iter().map(|z| z.angle_min > 0).collect();
        assert_eq!(signs, vec![true, false, true]);
    }

    #[test]
    fn rejects_empty_layout() {
        let layout = ZoneLayout {
            slots: 0,
            ..ZoneLayout::default()
        };
        assert!(layout.build(100).is_err());
    }
}

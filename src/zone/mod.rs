//! Search zones: per-slot windows of horizontal position and rotation.
//!
//! A [`ZoneSet`] starts with one zone per expected character and loses one
//! zone each time a match is accepted inside it.

mod layout;

pub use layout::{AngleSign, ZoneLayout};

use std::ops::RangeInclusive;

/// Horizontal band and rotation band for one character slot.
///
/// Both bands are inclusive. The vertical position is never stored; the
/// scorer centers each rotated glyph in the image height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchZone {
    /// Leftmost candidate x.
    pub x_min: usize,
    /// Rightmost candidate x.
    pub x_max: usize,
    /// Smallest rotation in degrees.
    pub angle_min: i32,
    /// Largest rotation in degrees.
    pub angle_max: i32,
}

impl SearchZone {
    /// Creates a zone from inclusive x and angle ranges.
    pub fn new(x: RangeInclusive<usize>, angle: RangeInclusive<i32>) -> Self {
        Self {
            x_min: *x.start(),
            x_max: *x.end(),
            angle_min: *angle.start(),
            angle_max: *angle.end(),
        }
    }

    /// Returns true if `x` lies in the horizontal band.
    pub fn contains_x(&self, x: usize) -> bool {
        (self.x_min..=self.x_max).contains(&x)
    }

    /// Angles from `angle_min` upward in `step` increments, never past `angle_max`.
    pub fn angles(&self, step: usize) -> impl Iterator<Item = i32> {
        (self.angle_min..=self.angle_max).step_by(step.max(1))
    }

    /// Positions from `x_min` to `x_max` in `step` increments.
    pub fn xs(&self, step: usize) -> impl Iterator<Item = usize> {
        (self.x_min..=self.x_max).step_by(step.max(1))
    }
}

/// Which zones the scorer visits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZonePruning {
    /// Search every zone until the first match, then only the first and
    /// last remaining zones while more than two remain.
    #[default]
    AfterFirstMatch,
    /// Search only the first and last zones whenever more than two remain,
    /// including the very first iteration.
    Always,
}

/// Ordered, shrinking collection of search zones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneSet {
    zones: Vec<SearchZone>,
    initial_len: usize,
}

impl ZoneSet {
    /// Creates a set from zones in slot order.
    pub fn new(zones: Vec<SearchZone>) -> Self {
        let initial_len = zones.len();
        Self { zones, initial_len }
    }

    /// Number of zones still open.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true once every zone has been consumed.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of zones the set was created with.
    pub fn initial_len(&self) -> usize {
        self.initial_len
    }

    /// Remaining zones in slot order.
    pub fn zones(&self) -> &[SearchZone] {
        &self.zones
    }

    /// Zones to search in the next iteration.
    ///
    /// This is an empirical shortcut: after a match the best remaining
    /// glyph tends to sit at one of the outer open slots. Nothing proves
    /// that a middle zone can never hold the better match.
    pub fn active(&self, pruning: ZonePruning) -> Vec<SearchZone> {
        let consumed = self.zones.len() < self.initial_len;
        let restrict = match pruning {
            ZonePruning::AfterFirstMatch => consumed,
            ZonePruning::Always => true,
        };
        match self.zones.as_slice() {
            [first, .., last] if restrict && self.zones.len() > 2 => vec![*first, *last],
            zones => zones.to_vec(),
        }
    }

    /// Index of the first zone whose x-band contains `x`.
    pub fn zone_containing(&self, x: usize) -> Option<usize> {
        self.zones.iter().position(|zone| zone.contains_x(x))
    }

    /// Removes and returns the zone at `index`.
    pub fn remove(&mut self, index: usize) -> Option<SearchZone> {
        (index < self.zones.len()).then(|| self.zones.remove(index))
    }

    /// Every distinct angle any zone can visit with the given step.
    pub fn angles(&self, step: usize) -> Vec<i32> {
        let mut angles: Vec<i32> = self.zones.iter().flat_map(|z| z.angles(step)).collect();
        angles.sort_unstable();
        angles.dedup();
        angles
    }
}

//! Closed interval on the track

use serde::{Deserialize, Serialize};

use super::token::Direction;
use crate::consts::POSITION_EPSILON;

/// Closed range `[min, max]` of legal track coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRange {
    pub min: f32,
    pub max: f32,
}

impl TrackRange {
    pub fn new(min: f32, max: f32) -> Self {
        assert!(min <= max, "track range [{min}, {max}] is inverted");
        Self { min, max }
    }

    /// Inclusive containment with `POSITION_EPSILON` slack
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min - POSITION_EPSILON && x <= self.max + POSITION_EPSILON
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Range shrunk by `amount` on the side `direction` travels toward.
    ///
    /// Used to keep a run of beads that extends `amount` ahead of its lead
    /// bead inside the track. Collapses to a point rather than inverting.
    pub fn shrink_ahead(&self, amount: f32, direction: Direction) -> TrackRange {
        match direction {
            Direction::Right => TrackRange {
                min: self.min,
                max: (self.max - amount).max(self.min),
            },
            Direction::Left => TrackRange {
                min: (self.min + amount).min(self.max),
                max: self.max,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = TrackRange::new(0.0, 10.0);
        assert!(range.contains(0.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.1));
        assert!(!range.contains(-0.1));
    }

    #[test]
    fn test_shrink_ahead() {
        let range = TrackRange::new(0.0, 10.0);
        assert_eq!(range.shrink_ahead(2.0, Direction::Right), TrackRange { min: 0.0, max: 8.0 });
        assert_eq!(range.shrink_ahead(2.0, Direction::Left), TrackRange { min: 2.0, max: 10.0 });
        assert_eq!(range.shrink_ahead(20.0, Direction::Right), TrackRange { min: 0.0, max: 0.0 });
    }

    #[test]
    #[should_panic(expected = "inverted")]
    fn test_inverted_range_panics() {
        TrackRange::new(5.0, 1.0);
    }
}

//! Bead position engine
//!
//! Pure transformations of ordered position lists. Every list handed in or
//! returned is sorted left-to-right unless a function says otherwise; the
//! engine keeps no state between calls.

use super::token::{Direction, Group};
use crate::consts::POSITION_EPSILON;
use crate::settings::TrackSettings;

/// Layout arithmetic for one track geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadPositionEngine {
    settings: TrackSettings,
}

impl BeadPositionEngine {
    pub fn new(settings: TrackSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    #[inline]
    fn slot(&self) -> f32 {
        self.settings.slot_width
    }

    /// Divider coordinate for a LEFT count
    #[inline]
    pub fn divider(&self, left_count: usize) -> f32 {
        self.settings.divider_position(left_count)
    }

    /// Closest a LEFT bead may sit to the divider
    #[inline]
    pub fn left_limit(&self, left_count: usize) -> f32 {
        self.divider(left_count) - self.slot() / 2.0
    }

    /// Closest a RIGHT bead may sit to the divider
    #[inline]
    pub fn right_limit(&self, left_count: usize) -> f32 {
        self.divider(left_count) + self.slot() / 2.0
    }

    /// Home slot of the innermost RIGHT bead
    pub fn inner_right(&self, left_count: usize) -> f32 {
        self.divider(left_count) + self.settings.divider_buffer
    }

    /// Home slot of the innermost LEFT bead (one empty slot below the RIGHT one)
    pub fn inner_left(&self, left_count: usize) -> f32 {
        self.inner_right(left_count) - 2.0 * self.slot()
    }

    /// Pack each group against the divider, one slot apart.
    pub fn default_layout(&self, left_count: usize, right_count: usize) -> (Vec<f32>, Vec<f32>) {
        let s = self.slot();
        let inner_left = self.inner_left(left_count);
        let inner_right = self.inner_right(left_count);

        let left = (0..left_count)
            .map(|i| inner_left - (left_count - 1 - i) as f32 * s)
            .collect();
        let right = (0..right_count)
            .map(|i| inner_right + i as f32 * s)
            .collect();

        (left, right)
    }

    /// Lay each group out in clusters of `cluster_size` with one empty slot
    /// between clusters. The partial cluster sits next to the divider.
    ///
    /// Only the group sizes are read from the inputs.
    pub fn grouped_by_five_layout(&self, left: &[f32], right: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let left_count = left.len();
        let right_count = right.len();
        let inner_left = self.inner_left(left_count);
        let inner_right = self.inner_right(left_count);

        let left = (0..left_count)
            .rev()
            .map(|j| inner_left - self.cluster_offset(left_count, j))
            .collect();
        let right = (0..right_count)
            .map(|j| inner_right + self.cluster_offset(right_count, j))
            .collect();

        (left, right)
    }

    /// Distance of the `j`th bead (counted outward from the divider) from
    /// the innermost bead of a clustered group of `count`
    fn cluster_offset(&self, count: usize, j: usize) -> f32 {
        let size = self.settings.cluster_size;
        let remainder = count % size;
        let cluster = if remainder == 0 {
            j / size
        } else if j < remainder {
            0
        } else {
            (j - remainder) / size + 1
        };
        (j + cluster) as f32 * self.slot()
    }

    /// Walk `positions` (given in traversal order) and push each one at least
    /// a slot beyond its predecessor in `direction`. The first position is
    /// pushed to at least `anchor`. Positions already far enough are kept.
    pub fn shift_to_resolve_overlap(
        &self,
        positions: &[f32],
        direction: Direction,
        anchor: f32,
    ) -> Vec<f32> {
        let step = direction.sign() * self.slot();
        let mut limit = anchor;

        positions
            .iter()
            .map(|&p| {
                let p = match direction {
                    Direction::Right => p.max(limit),
                    Direction::Left => p.min(limit),
                };
                limit = p + step;
                p
            })
            .collect()
    }

    /// Add one bead at the outer end of `group`.
    ///
    /// `left_count`/`right_count` are the counts after the insertion. When the
    /// natural slot is off the track the new bead takes the boundary and the
    /// group is shifted inward to make room.
    pub fn insert_token(
        &self,
        existing: &[f32],
        group: Group,
        left_count: usize,
        right_count: usize,
    ) -> Vec<f32> {
        let target = match group {
            Group::Left => left_count,
            Group::Right => right_count,
            Group::Inactive => panic!("cannot insert into the inactive pool"),
        };
        assert_eq!(
            existing.len() + 1,
            target,
            "{} group has {} beads, expected {} before insertion",
            group.as_str(),
            existing.len(),
            target - 1
        );

        if existing.is_empty() {
            let (left, right) = self.default_layout(left_count, right_count);
            return match group {
                Group::Left => left,
                _ => right,
            };
        }

        let range = self.settings.range();
        let s = self.slot();

        match group {
            Group::Left => {
                let natural = existing[0] - s;
                let mut positions = Vec::with_capacity(target);
                if natural >= range.min - POSITION_EPSILON {
                    positions.push(natural);
                    positions.extend_from_slice(existing);
                    positions
                } else {
                    positions.push(range.min);
                    positions.extend_from_slice(existing);
                    self.shift_to_resolve_overlap(&positions, Direction::Right, range.min)
                }
            }
            _ => {
                let natural = existing[existing.len() - 1] + s;
                let mut positions = existing.to_vec();
                if natural <= range.max + POSITION_EPSILON {
                    positions.push(natural);
                    positions
                } else {
                    positions.push(range.max);
                    positions.reverse();
                    let mut shifted =
                        self.shift_to_resolve_overlap(&positions, Direction::Left, range.max);
                    shifted.reverse();
                    shifted
                }
            }
        }
    }

    /// Drop the outer bead of `group`
    pub fn remove_outermost_token(&self, positions: &[f32], group: Group) -> Vec<f32> {
        assert!(!positions.is_empty(), "cannot remove from an empty group");
        match group {
            Group::Left => positions[1..].to_vec(),
            Group::Right => positions[..positions.len() - 1].to_vec(),
            Group::Inactive => panic!("cannot remove from the inactive pool"),
        }
    }

    /// Push both groups clear of the divider for `left_count`, then back
    /// inside the track.
    ///
    /// Each group only moves away from the divider in the first pass, so a
    /// settled layout is returned unchanged.
    pub fn settle_groups(
        &self,
        left: &[f32],
        right: &[f32],
        left_count: usize,
    ) -> (Vec<f32>, Vec<f32>) {
        assert_eq!(
            left.len(),
            left_count,
            "left positions out of sync with left count"
        );
        let range = self.settings.range();

        let outward: Vec<f32> = left.iter().rev().copied().collect();
        let mut left = self.shift_to_resolve_overlap(
            &outward,
            Direction::Left,
            self.left_limit(left_count),
        );
        left.reverse();
        let left = self.shift_to_resolve_overlap(&left, Direction::Right, range.min);

        let right =
            self.shift_to_resolve_overlap(right, Direction::Right, self.right_limit(left_count));
        let mut inward: Vec<f32> = right.into_iter().rev().collect();
        inward = self.shift_to_resolve_overlap(&inward, Direction::Left, range.max);
        inward.reverse();

        (left, inward)
    }
}

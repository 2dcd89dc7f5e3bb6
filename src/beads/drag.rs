//! Drag movement for beads on the track
//!
//! The controller works on a copy of the active beads handed in for one
//! interaction step and reports the result; `PartitionedTrack` applies it.
//! Nothing is retained between calls.

use super::layout::BeadPositionEngine;
use super::token::{Direction, Group, Token, TokenId};
use crate::approx_eq;
use crate::consts::POSITION_EPSILON;

/// A bead that changed addend during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub id: TokenId,
    pub from: Group,
    pub to: Group,
}

/// Result of one interaction step
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    /// Every active bead after the step, sorted left to right
    pub beads: Vec<Token>,
    /// Group changes in the order they happened
    pub crossings: Vec<Crossing>,
    /// Divider passes needed before no moved bead was on the wrong side
    pub passes: usize,
}

impl DragOutcome {
    fn unchanged(beads: Vec<Token>) -> Self {
        Self {
            beads,
            crossings: Vec::new(),
            passes: 0,
        }
    }
}

/// Turns proposed bead positions into full track layouts
#[derive(Debug, Clone, Copy)]
pub struct DragMoveController {
    engine: BeadPositionEngine,
}

impl DragMoveController {
    pub fn new(engine: BeadPositionEngine) -> Self {
        Self { engine }
    }

    fn slot(&self) -> f32 {
        self.engine.settings().slot_width
    }

    /// Move `grabbed` toward `proposed`, carrying its cohesive group along,
    /// reassigning beads that cross the divider and settling the rest.
    ///
    /// `active` must hold every active bead, sorted left to right.
    pub fn drag(&self, active: &[Token], grabbed: TokenId, proposed: f32) -> DragOutcome {
        assert!(proposed.is_finite(), "proposed position {proposed} is not finite");
        let index = find_bead(active, grabbed);
        let mut beads = active.to_vec();
        let current = beads[index].position;

        let Some(direction) = Direction::of_delta(proposed - current) else {
            return DragOutcome::unchanged(beads);
        };

        let members = self.cohesive_group(&beads, index, direction, proposed);
        let target = self.clamp_target(current, proposed, members.len(), direction);
        let members = if target == proposed {
            members
        } else {
            self.cohesive_group(&beads, index, direction, target)
        };

        let s = self.slot();
        for (rank, &i) in members.iter().enumerate() {
            let offset = target + direction.sign() * rank as f32 * s;
            beads[i].position = match direction {
                Direction::Right => beads[i].position.max(offset),
                Direction::Left => beads[i].position.min(offset),
            };
        }

        let (crossings, passes) = self.resolve_crossings(&mut beads, &members, direction);
        let beads = self.settle(beads);

        DragOutcome {
            beads,
            crossings,
            passes,
        }
    }

    /// Indices of the beads that move with `beads[index]`, grabbed bead first,
    /// then outward in `direction`.
    ///
    /// A bead joins while it touches the previous member and shares the
    /// grabbed bead's group, or whenever the run would land on top of it.
    fn cohesive_group(
        &self,
        beads: &[Token],
        index: usize,
        direction: Direction,
        target: f32,
    ) -> Vec<usize> {
        let s = self.slot();
        let group = beads[index].group;
        let ahead: Vec<usize> = match direction {
            Direction::Right => (index + 1..beads.len()).collect(),
            Direction::Left => (0..index).rev().collect(),
        };

        let mut members = vec![index];
        let mut touching = true;
        let mut previous = beads[index].position;

        for i in ahead {
            let x = beads[i].position;
            let landing = target + direction.sign() * members.len() as f32 * s;
            let crossed = match direction {
                Direction::Right => x < landing - POSITION_EPSILON,
                Direction::Left => x > landing + POSITION_EPSILON,
            };
            touching =
                touching && beads[i].group == group && (x - previous).abs() <= s + POSITION_EPSILON;

            if !(touching || crossed) {
                break;
            }
            members.push(i);
            previous = x;
        }

        assert!(!members.is_empty(), "cohesive group is empty");
        members
    }

    /// Keep a run of `count` beads led by the grabbed bead inside the track,
    /// without ever moving it backward.
    fn clamp_target(&self, current: f32, proposed: f32, count: usize, direction: Direction) -> f32 {
        let span = count.saturating_sub(1) as f32 * self.slot();
        let range = self.engine.settings().range().shrink_ahead(span, direction);
        let clamped = range.clamp(proposed);
        match direction {
            Direction::Right => clamped.max(current),
            Direction::Left => clamped.min(current),
        }
    }

    /// Reassign moved beads that ended up on the wrong side of the divider
    /// until none remain. Every reassignment moves the divider, so this
    /// repeats; each pass flips at least one bead one way, so the pool size
    /// bounds the number of passes.
    fn resolve_crossings(
        &self,
        beads: &mut [Token],
        members: &[usize],
        direction: Direction,
    ) -> (Vec<Crossing>, usize) {
        let cap = self.engine.settings().pool_size;
        let mut left_count = beads.iter().filter(|b| b.group == Group::Left).count();
        let mut crossings = Vec::new();
        let mut passes = 0;

        loop {
            let divider = self.engine.divider(left_count);
            let wrong: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&i| on_wrong_side(&beads[i], divider, direction))
                .collect();
            if wrong.is_empty() {
                break;
            }

            passes += 1;
            if passes > cap {
                panic!("divider crossings did not settle within {cap} passes");
            }

            for i in wrong {
                let from = beads[i].group;
                let to = from.opposite();
                beads[i].group = to;
                if to == Group::Left {
                    left_count += 1;
                } else {
                    left_count -= 1;
                }
                log::debug!(
                    "Bead {} crossed divider {:.2} at {:.2} ({} -> {})",
                    beads[i].id,
                    divider,
                    beads[i].position,
                    from.as_str(),
                    to.as_str()
                );
                crossings.push(Crossing {
                    id: beads[i].id,
                    from,
                    to,
                });
            }
        }

        (crossings, passes)
    }

    /// Restore spacing and divider clearance for every active bead
    fn settle(&self, mut beads: Vec<Token>) -> Vec<Token> {
        beads.sort_by(|a, b| a.position.total_cmp(&b.position));

        let left: Vec<f32> = group_positions(&beads, Group::Left);
        let right: Vec<f32> = group_positions(&beads, Group::Right);
        let (left, right) = self.engine.settle_groups(&left, &right, left.len());

        let mut left = left.into_iter();
        let mut right = right.into_iter();
        for bead in beads.iter_mut() {
            let next = match bead.group {
                Group::Left => left.next(),
                Group::Right => right.next(),
                Group::Inactive => panic!("inactive bead {} handed to the drag controller", bead.id),
            };
            if let Some(position) = next {
                bead.position = position;
            }
        }

        beads.sort_by(|a, b| a.position.total_cmp(&b.position));
        beads
    }

    /// Send `grabbed` across the divider to become the innermost bead of
    /// `target`.
    ///
    /// The bead takes the group's home slot for the new split, or the slot
    /// just inside the current innermost bead when that is closer to the
    /// divider. Settling afterwards makes room. A bead already in `target`
    /// stays put.
    pub fn batch_move(&self, active: &[Token], grabbed: TokenId, target: Group) -> DragOutcome {
        assert!(target.is_active(), "batch move target must be an addend group");
        let index = find_bead(active, grabbed);
        let mut beads = active.to_vec();

        let from = beads[index].group;
        if from == target {
            return DragOutcome::unchanged(beads);
        }

        let left_count = beads.iter().filter(|b| b.group == Group::Left).count();
        let s = self.slot();
        let innermost = beads
            .iter()
            .filter(|b| b.group == target)
            .map(|b| b.position);
        let position = match target {
            Group::Left => {
                let home = self.engine.inner_left(left_count + 1);
                innermost.fold(home, |p, x| p.max(x + s))
            }
            _ => {
                let home = self.engine.inner_right(left_count - 1);
                innermost.fold(home, |p, x| p.min(x - s))
            }
        };

        let bead = &mut beads[index];
        bead.position = position;
        bead.group = target;
        log::debug!(
            "Bead {} sent to the {} group at {:.2}",
            grabbed,
            target.as_str(),
            position
        );

        DragOutcome {
            beads: self.settle(beads),
            crossings: vec![Crossing {
                id: grabbed,
                from,
                to: target,
            }],
            passes: 1,
        }
    }

    /// On release, move a bead left within a slot of the divider out to its
    /// group's home slot, then settle. Beads at or beyond the home slot stay.
    pub fn drop_nudge(&self, active: &[Token], grabbed: TokenId) -> DragOutcome {
        let index = find_bead(active, grabbed);
        let mut beads = active.to_vec();

        let left_count = beads.iter().filter(|b| b.group == Group::Left).count();
        let divider = self.engine.divider(left_count);
        let s = self.slot();

        let bead = &mut beads[index];
        if (bead.position - divider).abs() < s - POSITION_EPSILON {
            let nudged = match bead.group {
                Group::Left => bead.position.min(self.engine.inner_left(left_count)),
                _ => bead.position.max(self.engine.inner_right(left_count)),
            };
            if !approx_eq(nudged, bead.position) {
                log::debug!(
                    "Nudging bead {} off the divider: {:.2} -> {:.2}",
                    grabbed,
                    bead.position,
                    nudged
                );
                bead.position = nudged;
            }
        }

        DragOutcome::unchanged(self.settle(beads))
    }
}

fn find_bead(active: &[Token], id: TokenId) -> usize {
    let Some(index) = active.iter().position(|b| b.id == id) else {
        panic!("bead {id} is not on the track");
    };
    debug_assert!(
        active.windows(2).all(|w| w[0].position <= w[1].position),
        "active beads must be sorted left to right"
    );
    index
}

fn group_positions(beads: &[Token], group: Group) -> Vec<f32> {
    beads
        .iter()
        .filter(|b| b.group == group)
        .map(|b| b.position)
        .collect()
}

/// Exact ties go to the group on the far side of the direction of travel
fn on_wrong_side(bead: &Token, divider: f32, direction: Direction) -> bool {
    let tied = approx_eq(bead.position, divider);
    match bead.group {
        Group::Left => {
            (bead.position > divider && !tied) || (tied && direction.tie_group() == Group::Right)
        }
        Group::Right => {
            (bead.position < divider && !tied) || (tied && direction.tie_group() == Group::Left)
        }
        Group::Inactive => false,
    }
}

//! Partitioned track: the bead pool and its LEFT/RIGHT/INACTIVE collections
//!
//! All bead state lives here. The engine and the drag controller compute new
//! positions from copies handed to them; this type applies the results and
//! keeps membership, positions and addend counts in sync.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::drag::{DragMoveController, DragOutcome};
use super::events::{TrackInput, TrackSnapshot};
use super::layout::BeadPositionEngine;
use super::token::{Direction, Group, Token, TokenId};
use crate::consts::{INACTIVE_POSITION, POSITION_EPSILON};
use crate::error::{InvariantViolation, SettingsError};
use crate::settings::TrackSettings;

/// Whether the track is at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionPhase {
    /// No drag in progress; every invariant holds exactly
    Settled,
    /// A bead is grabbed
    Dragging { token: TokenId },
    /// Addend counts are being reconciled; manipulation is refused
    Reconciling,
}

/// Bead pool partitioned around the divider
#[derive(Debug, Clone)]
pub struct PartitionedTrack {
    engine: BeadPositionEngine,
    controller: DragMoveController,
    /// Indexed by `TokenId`
    tokens: Vec<Token>,
    /// LEFT ids, sorted left to right
    left: Vec<TokenId>,
    /// RIGHT ids, sorted left to right
    right: Vec<TokenId>,
    /// Hidden beads; LEFT draws from the front, RIGHT from the back
    inactive: VecDeque<TokenId>,
    left_addend: usize,
    right_addend: usize,
    phase: InteractionPhase,
}

impl PartitionedTrack {
    /// Create the pool with every bead inactive
    pub fn new(settings: TrackSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let engine = BeadPositionEngine::new(settings);

        let tokens: Vec<Token> = (0..settings.pool_size)
            .map(|i| Token::new(TokenId(i as u32)))
            .collect();
        let inactive = tokens.iter().map(|t| t.id).collect();

        Ok(Self {
            engine,
            controller: DragMoveController::new(engine),
            tokens,
            left: Vec::with_capacity(settings.pool_size),
            right: Vec::with_capacity(settings.pool_size),
            inactive,
            left_addend: 0,
            right_addend: 0,
            phase: InteractionPhase::Settled,
        })
    }

    /// Create the pool and lay out the given addends
    pub fn with_addends(
        settings: TrackSettings,
        left: usize,
        right: usize,
    ) -> Result<Self, SettingsError> {
        let mut track = Self::new(settings)?;
        track.on_addend_counts_changed(left, right);
        track.on_reset_command();
        Ok(track)
    }

    // === Outbound ===

    pub fn settings(&self) -> &TrackSettings {
        self.engine.settings()
    }

    pub fn engine(&self) -> &BeadPositionEngine {
        &self.engine
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    /// Every bead in the pool, by id
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn left_ids(&self) -> &[TokenId] {
        &self.left
    }

    pub fn right_ids(&self) -> &[TokenId] {
        &self.right
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    pub fn divider(&self) -> f32 {
        self.engine.divider(self.left.len())
    }

    /// Current (left, right) addend values
    pub fn addends(&self) -> (usize, usize) {
        (self.left_addend, self.right_addend)
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == InteractionPhase::Settled
    }

    /// Manipulation is refused while a count change is in flight
    pub fn accepts_input(&self) -> bool {
        self.phase != InteractionPhase::Reconciling
    }

    /// Active beads sorted left to right
    pub fn active_tokens(&self) -> Vec<Token> {
        self.left
            .iter()
            .chain(&self.right)
            .map(|id| self.tokens[id.index()])
            .collect()
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            tokens: self.tokens.clone(),
            divider: self.divider(),
            left_addend: self.left_addend,
            right_addend: self.right_addend,
            settled: self.is_settled(),
        }
    }

    // === Inbound ===

    /// Dispatch one inbound event
    pub fn apply(&mut self, input: &TrackInput) {
        match *input {
            TrackInput::AddendCountsChanged { left, right } => {
                self.on_addend_counts_changed(left, right)
            }
            TrackInput::DragProposed { token, position } => self.on_drag_proposed(token, position),
            TrackInput::DragReleased { token } => self.on_drag_released(token),
            TrackInput::Home { token } => self.on_home_command(token),
            TrackInput::End { token } => self.on_end_command(token),
            TrackInput::KeyboardStep { token, direction } => {
                self.on_keyboard_step(token, direction)
            }
            TrackInput::Organize => self.on_organize_command(),
            TrackInput::Reset => self.on_reset_command(),
        }
    }

    /// Reconcile group sizes with new addend values.
    ///
    /// Opposite, cancelling changes move beads straight across the divider.
    /// Anything else goes through the inactive pool: removals first, then
    /// insertions at the outer ends.
    pub fn on_addend_counts_changed(&mut self, left: usize, right: usize) {
        let pool = self.tokens.len();
        assert!(
            left + right <= pool,
            "addends {left}+{right} exceed the pool of {pool} beads"
        );
        if let InteractionPhase::Dragging { token } = self.phase {
            log::debug!("Count change while dragging bead {token}; releasing first");
            self.on_drag_released(token);
        }

        self.phase = InteractionPhase::Reconciling;

        let left_delta = left as i64 - self.left.len() as i64;
        let right_delta = right as i64 - self.right.len() as i64;
        log::debug!(
            "Reconciling addends {}+{} -> {}+{} (deltas {:+}, {:+})",
            self.left.len(),
            self.right.len(),
            left,
            right,
            left_delta,
            right_delta
        );

        if left_delta != 0 && right_delta != 0 && left_delta + right_delta == 0 {
            for _ in 0..left_delta.unsigned_abs() {
                if left_delta > 0 {
                    let id = self.right[0];
                    self.transfer(id, Group::Left);
                } else {
                    let id = self.left[self.left.len() - 1];
                    self.transfer(id, Group::Right);
                }
            }
        } else {
            for _ in 0..(-left_delta).max(0) {
                self.deactivate(Group::Left);
            }
            for _ in 0..(-right_delta).max(0) {
                self.deactivate(Group::Right);
            }
            for _ in 0..left_delta.max(0) {
                self.activate(Group::Left);
            }
            for _ in 0..right_delta.max(0) {
                self.activate(Group::Right);
            }
        }

        self.left_addend = left;
        self.right_addend = right;
        self.settle();
        self.phase = InteractionPhase::Settled;
    }

    /// Move a grabbed bead toward `position` for one drag step
    pub fn on_drag_proposed(&mut self, id: TokenId, position: f32) {
        self.begin_manipulation(id);
        self.phase = InteractionPhase::Dragging { token: id };

        let outcome = self.controller.drag(&self.active_tokens(), id, position);
        self.apply_outcome(outcome);
    }

    /// Finish a drag: nudge the bead off the divider and settle
    pub fn on_drag_released(&mut self, id: TokenId) {
        self.expect_known(id);
        if self.phase != (InteractionPhase::Dragging { token: id }) {
            log::warn!("Ignoring release of bead {id}, which is not being dragged");
            return;
        }

        let outcome = self.controller.drop_nudge(&self.active_tokens(), id);
        self.apply_outcome(outcome);
        self.phase = InteractionPhase::Settled;
    }

    /// Send a bead to the LEFT addend
    pub fn on_home_command(&mut self, id: TokenId) {
        self.batch_move(id, Group::Left);
    }

    /// Send a bead to the RIGHT addend
    pub fn on_end_command(&mut self, id: TokenId) {
        self.batch_move(id, Group::Right);
    }

    /// Move a bead one slot as a drag step without the release nudge, so
    /// repeated steps walk it across the divider
    pub fn on_keyboard_step(&mut self, id: TokenId, direction: Direction) {
        let was = self.begin_manipulation(id);
        let target = self.tokens[id.index()].position + direction.sign() * self.settings().slot_width;

        let outcome = self.controller.drag(&self.active_tokens(), id, target);
        self.apply_outcome(outcome);
        self.phase = was;
    }

    /// Lay both groups out in clusters
    pub fn on_organize_command(&mut self) {
        self.cancel_drag();
        let left = self.positions(Group::Left);
        let right = self.positions(Group::Right);
        let (left, right) = self.engine.grouped_by_five_layout(&left, &right);
        self.write_positions(Group::Left, &left);
        self.write_positions(Group::Right, &right);
        log::info!("Organized {}+{} beads", self.left.len(), self.right.len());
    }

    /// Discard drag state and restore the default layout for the current counts
    pub fn on_reset_command(&mut self) {
        self.cancel_drag();
        let (left, right) = self.engine.default_layout(self.left.len(), self.right.len());
        self.write_positions(Group::Left, &left);
        self.write_positions(Group::Right, &right);
        log::info!("Reset track to {}+{}", self.left.len(), self.right.len());
    }

    // === Invariants ===

    /// Check every track invariant
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let pool = self.tokens.len();
        let active = self.left.len() + self.right.len();

        if self.left.len() != self.left_addend || self.right.len() != self.right_addend {
            return Err(InvariantViolation::CountMismatch {
                left: self.left.len(),
                right: self.right.len(),
                left_addend: self.left_addend,
                right_addend: self.right_addend,
            });
        }
        if self.inactive.len() + active != pool {
            return Err(InvariantViolation::PoolMismatch {
                inactive: self.inactive.len(),
                active,
                pool,
            });
        }

        let collections = [
            (Group::Left, self.left.iter().collect::<Vec<_>>()),
            (Group::Right, self.right.iter().collect()),
            (Group::Inactive, self.inactive.iter().collect()),
        ];
        for (group, ids) in &collections {
            for id in ids {
                let token = &self.tokens[id.index()];
                if token.group != *group {
                    return Err(InvariantViolation::MembershipMismatch {
                        id: **id,
                        recorded: token.group.as_str(),
                        collection: group.as_str(),
                    });
                }
            }
        }

        let range = self.settings().range();
        let divider = self.divider();
        let beads = self.active_tokens();
        for bead in &beads {
            if !range.contains(bead.position) {
                return Err(InvariantViolation::OutOfBounds {
                    id: bead.id,
                    position: bead.position,
                });
            }
            let wrong_side = match bead.group {
                Group::Left => bead.position > divider + POSITION_EPSILON,
                _ => bead.position < divider - POSITION_EPSILON,
            };
            if wrong_side {
                return Err(InvariantViolation::WrongSide {
                    id: bead.id,
                    position: bead.position,
                    divider,
                });
            }
        }
        for pair in beads.windows(2) {
            let gap = pair[1].position - pair[0].position;
            if gap < self.settings().slot_width - POSITION_EPSILON {
                return Err(InvariantViolation::Overlap {
                    first: pair[0].id,
                    second: pair[1].id,
                    gap,
                });
            }
        }

        Ok(())
    }

    // === Internals ===

    fn expect_known(&self, id: TokenId) {
        assert!(
            id.index() < self.tokens.len(),
            "bead {id} is not in the pool of {}",
            self.tokens.len()
        );
    }

    /// Checks shared by every manipulation entry point; returns the phase
    /// the track was in
    fn begin_manipulation(&mut self, id: TokenId) -> InteractionPhase {
        assert!(
            self.accepts_input(),
            "bead {id} manipulated while addend counts are being reconciled"
        );
        self.expect_known(id);
        assert!(
            self.tokens[id.index()].is_active(),
            "bead {id} is not on the track"
        );

        match self.phase {
            InteractionPhase::Dragging { token } if token != id => {
                log::debug!("Bead {id} grabbed while dragging bead {token}; releasing first");
                self.on_drag_released(token);
                InteractionPhase::Settled
            }
            phase => phase,
        }
    }

    fn cancel_drag(&mut self) {
        if let InteractionPhase::Dragging { token } = self.phase {
            log::debug!("Discarding drag of bead {token}");
        }
        self.phase = InteractionPhase::Settled;
    }

    fn batch_move(&mut self, id: TokenId, target: Group) {
        let was = self.begin_manipulation(id);
        let outcome = self.controller.batch_move(&self.active_tokens(), id, target);
        self.apply_outcome(outcome);
        self.phase = was;
    }

    fn collection(&self, group: Group) -> &Vec<TokenId> {
        match group {
            Group::Left => &self.left,
            Group::Right => &self.right,
            Group::Inactive => panic!("the inactive pool has no positions"),
        }
    }

    fn collection_mut(&mut self, group: Group) -> &mut Vec<TokenId> {
        match group {
            Group::Left => &mut self.left,
            Group::Right => &mut self.right,
            Group::Inactive => panic!("the inactive pool has no positions"),
        }
    }

    fn positions(&self, group: Group) -> Vec<f32> {
        self.collection(group)
            .iter()
            .map(|id| self.tokens[id.index()].position)
            .collect()
    }

    fn write_positions(&mut self, group: Group, positions: &[f32]) {
        let ids = self.collection(group).clone();
        assert_eq!(
            ids.len(),
            positions.len(),
            "{} positions out of sync with the {} group",
            positions.len(),
            group.as_str()
        );
        for (id, &position) in ids.iter().zip(positions) {
            self.tokens[id.index()].position = position;
        }
    }

    fn sort_collections(&mut self) {
        let tokens = &self.tokens;
        let by_position = |a: &TokenId, b: &TokenId| {
            tokens[a.index()]
                .position
                .total_cmp(&tokens[b.index()].position)
        };
        self.left.sort_by(by_position);
        self.right.sort_by(by_position);
    }

    /// Pull a bead from the pool onto the outer end of `group`
    fn activate(&mut self, group: Group) -> TokenId {
        let id = match group {
            Group::Left => self.inactive.pop_front(),
            Group::Right => self.inactive.pop_back(),
            Group::Inactive => panic!("cannot activate into the inactive pool"),
        };
        let Some(id) = id else {
            panic!("no inactive beads left to add to the {} group", group.as_str());
        };

        let existing = self.positions(group);
        let (left_count, right_count) = match group {
            Group::Left => (self.left.len() + 1, self.right.len()),
            _ => (self.left.len(), self.right.len() + 1),
        };
        let positions = self
            .engine
            .insert_token(&existing, group, left_count, right_count);

        self.tokens[id.index()].group = group;
        match group {
            Group::Left => self.left.insert(0, id),
            _ => self.right.push(id),
        }
        self.write_positions(group, &positions);
        log::debug!("Bead {id} joined the {} group", group.as_str());
        id
    }

    /// Return the outer bead of `group` to the pool
    fn deactivate(&mut self, group: Group) -> TokenId {
        let existing = self.positions(group);
        let positions = self.engine.remove_outermost_token(&existing, group);

        let id = match group {
            Group::Left => {
                let id = self.left.remove(0);
                self.inactive.push_front(id);
                id
            }
            _ => {
                let Some(id) = self.right.pop() else {
                    panic!("cannot remove from an empty right group");
                };
                self.inactive.push_back(id);
                id
            }
        };

        let token = &mut self.tokens[id.index()];
        token.group = Group::Inactive;
        token.position = INACTIVE_POSITION;
        self.write_positions(group, &positions);
        log::debug!("Bead {id} left the {} group", group.as_str());
        id
    }

    /// Move an active bead to the other addend group
    fn transfer(&mut self, id: TokenId, to: Group) {
        let from = self.tokens[id.index()].group;
        assert!(
            from.is_active() && to == from.opposite(),
            "illegal transition for bead {id}: {} -> {}",
            from.as_str(),
            to.as_str()
        );

        self.collection_mut(from).retain(|&other| other != id);
        self.tokens[id.index()].group = to;
        self.collection_mut(to).push(id);
        self.sort_collections();
    }

    /// Re-anchor both groups on the divider for the current LEFT count
    fn settle(&mut self) {
        let left = self.positions(Group::Left);
        let right = self.positions(Group::Right);
        let (left, right) = self.engine.settle_groups(&left, &right, left.len());
        self.write_positions(Group::Left, &left);
        self.write_positions(Group::Right, &right);
        self.sort_collections();
    }

    fn apply_outcome(&mut self, outcome: DragOutcome) {
        for bead in &outcome.beads {
            self.tokens[bead.id.index()].position = bead.position;
        }
        for crossing in &outcome.crossings {
            self.transfer(crossing.id, crossing.to);
        }
        debug_assert!(
            outcome
                .beads
                .iter()
                .all(|b| self.tokens[b.id.index()].group == b.group),
            "drag outcome disagrees with track membership"
        );
        self.sort_collections();

        self.left_addend = self.left.len();
        self.right_addend = self.right.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(left: usize, right: usize) -> PartitionedTrack {
        PartitionedTrack::with_addends(TrackSettings::default(), left, right).unwrap()
    }

    fn ids(values: &[u32]) -> Vec<TokenId> {
        values.iter().map(|&v| TokenId(v)).collect()
    }

    #[test]
    fn test_initial_layout_matches_default() {
        let track = track(3, 2);
        track.verify().unwrap();
        assert_eq!(track.addends(), (3, 2));
        assert_eq!(track.inactive_count(), 15);

        let (left, right) = track.engine().default_layout(3, 2);
        let positions: Vec<f32> = track.active_tokens().iter().map(|t| t.position).collect();
        let expected: Vec<f32> = left.into_iter().chain(right).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_left_draws_from_front_right_from_back() {
        let track = track(3, 2);
        assert_eq!(track.left_ids(), &ids(&[2, 1, 0])[..]);
        assert_eq!(track.right_ids(), &ids(&[19, 18])[..]);
    }

    #[test]
    fn test_count_increase_inserts_outermost() {
        let mut track = track(3, 2);
        let before = track.token(TokenId(2)).copied().unwrap();
        track.on_addend_counts_changed(4, 2);
        track.verify().unwrap();

        assert_eq!(track.left_ids().len(), 4);
        assert_eq!(track.left_ids()[0], TokenId(3));
        let added = track.token(TokenId(3)).copied().unwrap();
        assert_eq!(added.group, Group::Left);
        assert!(added.position < before.position);
    }

    #[test]
    fn test_count_decrease_returns_bead_to_pool() {
        let mut track = track(3, 2);
        track.on_addend_counts_changed(2, 1);
        track.verify().unwrap();

        let removed_left = track.token(TokenId(2)).copied().unwrap();
        assert_eq!(removed_left.group, Group::Inactive);
        assert_eq!(removed_left.position, INACTIVE_POSITION);
        assert_eq!(track.token(TokenId(18)).unwrap().group, Group::Inactive);

        // The same ids come back when the counts grow again
        track.on_addend_counts_changed(3, 2);
        assert_eq!(track.token(TokenId(2)).unwrap().group, Group::Left);
        assert_eq!(track.token(TokenId(18)).unwrap().group, Group::Right);
    }

    #[test]
    fn test_cancelling_change_transfers_directly() {
        let mut track = track(3, 2);
        track.on_addend_counts_changed(2, 3);
        track.verify().unwrap();

        assert_eq!(track.inactive_count(), 15);
        // The innermost LEFT bead became the innermost RIGHT bead
        assert_eq!(track.right_ids()[0], TokenId(0));
        assert_eq!(track.token(TokenId(0)).unwrap().group, Group::Right);
    }

    #[test]
    fn test_simultaneous_insert_and_remove() {
        let mut track = track(3, 2);
        track.on_addend_counts_changed(1, 6);
        track.verify().unwrap();
        assert_eq!(track.addends(), (1, 6));
        assert_eq!(track.inactive_count(), 13);
    }

    #[test]
    fn test_full_pool_and_empty_groups() {
        let mut track = track(0, 20);
        track.verify().unwrap();
        assert_eq!(track.inactive_count(), 0);

        track.on_addend_counts_changed(20, 0);
        track.verify().unwrap();
        assert_eq!(track.addends(), (20, 0));

        track.on_addend_counts_changed(0, 0);
        track.verify().unwrap();
        assert_eq!(track.inactive_count(), 20);
    }

    #[test]
    #[should_panic(expected = "exceed the pool")]
    fn test_counts_beyond_pool_panic() {
        track(3, 2).on_addend_counts_changed(15, 6);
    }

    #[test]
    fn test_drag_crossing_updates_addends() {
        let mut track = track(3, 2);
        let innermost_right = track.right_ids()[0];
        track.on_drag_proposed(innermost_right, 15.0);

        assert!(!track.is_settled());
        assert_eq!(track.addends(), (4, 1));
        assert_eq!(track.token(innermost_right).unwrap().group, Group::Left);
        assert!(track.left_ids().contains(&innermost_right));
        track.verify().unwrap();

        track.on_drag_released(innermost_right);
        assert!(track.is_settled());
        track.verify().unwrap();
    }

    #[test]
    fn test_release_of_other_bead_is_ignored() {
        let mut track = track(3, 2);
        let snapshot = track.snapshot();
        track.on_drag_released(TokenId(0));
        assert_eq!(track.snapshot(), snapshot);
    }

    #[test]
    fn test_grabbing_second_bead_releases_first() {
        let mut track = track(3, 2);
        track.on_drag_proposed(TokenId(19), 19.5);
        track.on_drag_proposed(TokenId(0), 14.0);
        assert_eq!(track.phase(), InteractionPhase::Dragging { token: TokenId(0) });
        track.verify().unwrap();
    }

    #[test]
    fn test_keyboard_steps_walk_across_divider() {
        let mut track = track(3, 2);
        let bead = track.right_ids()[0];
        track.on_keyboard_step(bead, Direction::Left);
        assert_eq!(track.token(bead).unwrap().group, Group::Right);
        track.on_keyboard_step(bead, Direction::Left);
        assert_eq!(track.token(bead).unwrap().group, Group::Left);
        assert_eq!(track.addends(), (4, 1));
        assert!(track.is_settled());
        track.verify().unwrap();
    }

    #[test]
    fn test_home_and_end_commands() {
        let mut track = track(3, 2);
        track.on_end_command(TokenId(0));
        assert_eq!(track.addends(), (2, 3));
        assert_eq!(track.token(TokenId(0)).unwrap().group, Group::Right);
        track.verify().unwrap();

        track.on_home_command(TokenId(19));
        assert_eq!(track.addends(), (3, 2));
        track.verify().unwrap();

        // Already on the left: nothing changes
        let snapshot = track.snapshot();
        track.on_home_command(TokenId(19));
        assert_eq!(track.snapshot(), snapshot);
    }

    #[test]
    fn test_home_lands_innermost_left() {
        let mut track = track(3, 2);
        track.on_home_command(TokenId(18));
        track.verify().unwrap();
        assert_eq!(track.left_ids(), &ids(&[2, 1, 0, 18])[..]);
    }

    #[test]
    fn test_end_lands_innermost_right() {
        let mut track = track(3, 2);
        track.on_end_command(TokenId(2));
        track.verify().unwrap();
        assert_eq!(track.right_ids(), &ids(&[2, 19, 18])[..]);
    }

    #[test]
    fn test_click_without_moving_keeps_layout() {
        for id in [0, 1, 2, 19, 18] {
            let mut track = track(3, 2);
            let before: Vec<f32> = track.active_tokens().iter().map(|t| t.position).collect();
            let position = track.token(TokenId(id)).unwrap().position;

            track.on_drag_proposed(TokenId(id), position);
            track.on_drag_released(TokenId(id));

            let after: Vec<f32> = track.active_tokens().iter().map(|t| t.position).collect();
            for (b, a) in before.iter().zip(&after) {
                assert!((b - a).abs() < 0.0001, "bead #{id}: {before:?} -> {after:?}");
            }
        }
    }

    #[test]
    fn test_organize_then_rederive_split() {
        let mut track = track(7, 6);
        track.on_organize_command();
        track.verify().unwrap();

        let divider = track.divider();
        let left = track
            .active_tokens()
            .iter()
            .filter(|t| t.position < divider)
            .count();
        assert_eq!(left, 7);
        assert_eq!(track.active_tokens().len() - left, 6);
    }

    #[test]
    fn test_reset_discards_drag() {
        let mut track = track(3, 2);
        track.on_drag_proposed(TokenId(18), 25.0);
        track.on_reset_command();
        assert!(track.is_settled());

        let (left, right) = track.engine().default_layout(3, 2);
        let positions: Vec<f32> = track.active_tokens().iter().map(|t| t.position).collect();
        let expected: Vec<f32> = left.into_iter().chain(right).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_count_change_mid_drag_settles_first() {
        let mut track = track(3, 2);
        track.on_drag_proposed(TokenId(18), 22.0);
        track.on_addend_counts_changed(5, 5);
        assert!(track.is_settled());
        assert_eq!(track.addends(), (5, 5));
        track.verify().unwrap();
    }

    #[test]
    #[should_panic(expected = "not on the track")]
    fn test_dragging_inactive_bead_panics() {
        track(3, 2).on_drag_proposed(TokenId(10), 4.0);
    }

    #[test]
    #[should_panic(expected = "not in the pool")]
    fn test_unknown_id_panics() {
        track(3, 2).on_drag_proposed(TokenId(99), 4.0);
    }

    #[test]
    fn test_apply_dispatches_inputs() {
        let mut track = track(3, 2);
        track.apply(&TrackInput::AddendCountsChanged { left: 5, right: 4 });
        track.apply(&TrackInput::Organize);
        track.apply(&TrackInput::End { token: TokenId(0) });
        assert_eq!(track.addends(), (4, 5));
        track.verify().unwrap();
    }

    #[test]
    fn test_snapshot_reports_every_bead() {
        let track = track(4, 3);
        let snapshot = track.snapshot();
        assert_eq!(snapshot.tokens.len(), 20);
        assert_eq!(snapshot.total(), 7);
        assert!(snapshot.settled);
        assert!((snapshot.divider - track.divider()).abs() < f32::EPSILON);
    }
}

//! Inbound commands and the outbound view read by collaborators

use serde::{Deserialize, Serialize};

use super::token::{Direction, Token, TokenId};

/// One inbound event for the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackInput {
    /// Addend controls changed the counts
    AddendCountsChanged { left: usize, right: usize },
    /// Pointer or keyboard proposes a new position for a grabbed bead
    DragProposed { token: TokenId, position: f32 },
    DragReleased { token: TokenId },
    /// Send the bead to the LEFT addend
    Home { token: TokenId },
    /// Send the bead to the RIGHT addend
    End { token: TokenId },
    /// Move one slot and settle immediately
    KeyboardStep { token: TokenId, direction: Direction },
    Organize,
    Reset,
}

/// What the rendering and mirroring layers read each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    /// Every bead in the pool, by id
    pub tokens: Vec<Token>,
    pub divider: f32,
    pub left_addend: usize,
    pub right_addend: usize,
    /// False while a drag is in progress
    pub settled: bool,
}

impl TrackSnapshot {
    pub fn total(&self) -> usize {
        self.left_addend + self.right_addend
    }
}

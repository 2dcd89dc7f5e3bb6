//! Bead track module
//!
//! Everything that decides where beads sit lives here. This module is pure:
//! - No rendering, animation or accessibility state
//! - Every operation completes synchronously
//! - Stable iteration order (left to right, then by bead id)

pub mod drag;
pub mod events;
pub mod layout;
pub mod range;
pub mod token;
pub mod track;

pub use drag::{Crossing, DragMoveController, DragOutcome};
pub use events::{TrackInput, TrackSnapshot};
pub use layout::BeadPositionEngine;
pub use range::TrackRange;
pub use token::{Direction, Group, Token, TokenId};
pub use track::{InteractionPhase, PartitionedTrack};

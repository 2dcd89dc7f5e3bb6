//! Bead Line - the bead track behind an addend decomposition simulation
//!
//! Core modules:
//! - `beads`: Track engine (layout, partitioning, drag movement)
//! - `settings`: Track configuration with JSON load/save
//! - `error`: Recoverable error types

pub mod beads;
pub mod error;
pub mod settings;

pub use beads::{
    BeadPositionEngine, DragMoveController, Group, InteractionPhase, PartitionedTrack, Token,
    TokenId, TrackInput, TrackSnapshot,
};
pub use error::{InvariantViolation, SettingsError};
pub use settings::TrackSettings;

/// Track configuration constants
pub mod consts {
    /// Width of one slot (minimum spacing between active beads)
    pub const SLOT_WIDTH: f32 = 1.0;
    /// Track bounds in slot units
    pub const TRACK_MIN_X: f32 = 0.0;
    pub const TRACK_MAX_X: f32 = 40.0;

    /// Distance from the divider to the innermost RIGHT bead
    pub const DIVIDER_BUFFER: f32 = 1.5;
    /// divider(left) = left / DIVIDER_SCALE + DIVIDER_OFFSET
    pub const DIVIDER_SCALE: f32 = 2.2;
    pub const DIVIDER_OFFSET: f32 = 15.0;

    /// Beads per cluster in the organized layout
    pub const CLUSTER_SIZE: usize = 5;
    /// Largest supported total (size of the bead pool)
    pub const POOL_SIZE: usize = 20;

    /// Position reported for inactive beads
    pub const INACTIVE_POSITION: f32 = -1.0;
    /// Tolerance for position comparisons
    pub const POSITION_EPSILON: f32 = 1e-4;
}

/// True if `a` and `b` are within `POSITION_EPSILON` of each other
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= consts::POSITION_EPSILON
}

//! Recoverable error types
//!
//! Caller bugs (length mismatches, unknown ids) panic instead; these cover
//! configuration input and invariant checks used by tooling.

use thiserror::Error;

use crate::beads::TokenId;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("track [{min_x}, {max_x}] cannot hold {needed} slots")]
    TrackTooShort { min_x: f32, max_x: f32, needed: f32 },
}

impl SettingsError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// A broken track invariant, reported by `PartitionedTrack::verify`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("group sizes {left}+{right} do not match addends {left_addend}+{right_addend}")]
    CountMismatch {
        left: usize,
        right: usize,
        left_addend: usize,
        right_addend: usize,
    },

    #[error("{inactive} inactive beads but pool holds {pool} with {active} active")]
    PoolMismatch {
        inactive: usize,
        active: usize,
        pool: usize,
    },

    #[error("beads {first} and {second} are {gap} apart, closer than one slot")]
    Overlap {
        first: TokenId,
        second: TokenId,
        gap: f32,
    },

    #[error("bead {id} at {position} is on the wrong side of divider {divider}")]
    WrongSide {
        id: TokenId,
        position: f32,
        divider: f32,
    },

    #[error("bead {id} at {position} is outside the track")]
    OutOfBounds { id: TokenId, position: f32 },

    #[error("bead {id} is recorded as {recorded} but sits in the {collection} collection")]
    MembershipMismatch {
        id: TokenId,
        recorded: &'static str,
        collection: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_constructor_keeps_field() {
        let error = SettingsError::invalid("slot_width", "must be positive");
        assert_eq!(
            error.to_string(),
            "invalid setting slot_width: must be positive"
        );
    }

    #[test]
    fn test_violation_message_names_bead() {
        let violation = InvariantViolation::OutOfBounds {
            id: TokenId(3),
            position: 41.0,
        };
        assert_eq!(violation.to_string(), "bead #3 at 41 is outside the track");
    }
}

//! Bead identity, group membership and travel direction

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::INACTIVE_POSITION;

/// Stable bead identifier, assigned once when the pool is created
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenId(pub u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which addend a bead currently counts toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Group {
    Left,
    Right,
    /// Hidden in the pool
    #[default]
    Inactive,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Left => "left",
            Group::Right => "right",
            Group::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Group::Inactive)
    }

    /// The other active group
    pub fn opposite(&self) -> Group {
        match self {
            Group::Left => Group::Right,
            Group::Right => Group::Left,
            Group::Inactive => panic!("inactive beads have no opposite group"),
        }
    }

    /// Direction pointing away from the divider for this group
    pub fn outward(&self) -> Direction {
        match self {
            Group::Left => Direction::Left,
            Group::Right => Direction::Right,
            Group::Inactive => panic!("inactive beads have no outward direction"),
        }
    }
}

/// Direction of travel along the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction implied by a displacement; `None` when there is no movement
    pub fn of_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Right)
        } else if delta < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// Group a bead joins when it settles exactly on the divider while moving
    pub fn tie_group(self) -> Group {
        match self {
            Direction::Left => Group::Left,
            Direction::Right => Group::Right,
        }
    }
}

/// A single bead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub group: Group,
    /// Track coordinate; `INACTIVE_POSITION` while inactive
    pub position: f32,
}

impl Token {
    pub fn new(id: TokenId) -> Self {
        Self {
            id,
            group: Group::Inactive,
            position: INACTIVE_POSITION,
        }
    }

    pub fn is_active(&self) -> bool {
        self.group.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_inactive() {
        let token = Token::new(TokenId(7));
        assert_eq!(token.group, Group::Inactive);
        assert_eq!(token.position, INACTIVE_POSITION);
        assert!(!token.is_active());
    }

    #[test]
    fn test_direction_of_delta() {
        assert_eq!(Direction::of_delta(0.5), Some(Direction::Right));
        assert_eq!(Direction::of_delta(-0.5), Some(Direction::Left));
        assert_eq!(Direction::of_delta(0.0), None);
    }

    #[test]
    fn test_tie_group_follows_direction() {
        assert_eq!(Direction::Right.tie_group(), Group::Right);
        assert_eq!(Direction::Left.tie_group(), Group::Left);
    }

    #[test]
    fn test_group_outward() {
        assert_eq!(Group::Left.outward(), Direction::Left);
        assert_eq!(Group::Right.outward(), Direction::Right);
        assert_eq!(Group::Left.opposite(), Group::Right);
    }
}

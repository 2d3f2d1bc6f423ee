//! Game phases.
//!
//! `Spawn(A) → Spawn(B) → Move(A) ⇄ Move(B) → End`. Transitions only move
//! forward; the two move phases alternate until a side wins.

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Current phase of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The side is placing its pieces.
    Spawn(Side),
    /// The side is to move.
    Move(Side),
    /// A side has won.
    End,
}

impl Phase {
    /// The side expected to act, if any.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Phase::Spawn(side) | Phase::Move(side) => Some(side),
            Phase::End => None,
        }
    }

    #[must_use]
    pub const fn is_spawn(self) -> bool {
        matches!(self, Phase::Spawn(_))
    }

    #[must_use]
    pub const fn is_move(self) -> bool {
        matches!(self, Phase::Move(_))
    }

    /// Phase after `side` confirms its spawn, if this is `side`'s spawn phase.
    #[must_use]
    pub const fn after_spawn(self) -> Option<Phase> {
        match self {
            Phase::Spawn(Side::A) => Some(Phase::Spawn(Side::B)),
            Phase::Spawn(Side::B) => Some(Phase::Move(Side::A)),
            _ => None,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Spawn(Side::A)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Spawn(side) => write!(f, "Spawn({side})"),
            Phase::Move(side) => write!(f, "Move({side})"),
            Phase::End => write!(f, "End"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_order() {
        assert_eq!(Phase::default(), Phase::Spawn(Side::A));
        assert_eq!(Phase::Spawn(Side::A).after_spawn(), Some(Phase::Spawn(Side::B)));
        assert_eq!(Phase::Spawn(Side::B).after_spawn(), Some(Phase::Move(Side::A)));
        assert_eq!(Phase::Move(Side::A).after_spawn(), None);
        assert_eq!(Phase::End.after_spawn(), None);
    }

    #[test]
    fn test_side() {
        assert_eq!(Phase::Spawn(Side::B).side(), Some(Side::B));
        assert_eq!(Phase::Move(Side::A).side(), Some(Side::A));
        assert_eq!(Phase::End.side(), None);
        assert!(Phase::Move(Side::B).is_move());
        assert!(!Phase::End.is_spawn());
    }
}

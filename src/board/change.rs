//! Requests submitted to the board and the record of what a move did.

use serde::{Deserialize, Serialize};

use crate::core::{Piece, PieceId, Position, Side};
use crate::rules::BattleOutcome;

/// Request to place a reserve piece during the spawn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnInfo {
    pub piece: PieceId,
    pub target: Position,
}

impl SpawnInfo {
    #[must_use]
    pub const fn new(piece: PieceId, target: Position) -> Self {
        Self { piece, target }
    }
}

/// Request to move a piece one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveInfo {
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
}

impl MoveInfo {
    #[must_use]
    pub const fn new(piece: PieceId, from: Position, to: Position) -> Self {
        Self { piece, from, to }
    }

    /// Side of the moving piece.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.piece.side()
    }

    /// Check if the step heads toward the enemy baseline.
    #[must_use]
    pub fn advances(&self) -> bool {
        self.to.y - self.from.y == self.side().forward()
    }
}

impl std::fmt::Display for MoveInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> {}", self.piece, self.from, self.to)
    }
}

/// Immutable record of the last applied move.
///
/// Piece snapshots are taken after the move resolved, so a losing piece
/// shows up as dead. Ranks are as visible on the board that applied it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardChange {
    pub mover: Piece,
    /// The piece that occupied the target cell, if any.
    pub defender: Option<Piece>,
    pub from: Position,
    pub to: Position,
    /// Combat result, `None` for a plain step.
    pub battle: Option<BattleOutcome>,
    /// Winning side of the combat; `None` for a plain step or a mutual kill.
    pub winner: Option<Side>,
}

impl BoardChange {
    /// Check if the move attacked an enemy piece.
    #[must_use]
    pub fn was_attack(&self) -> bool {
        self.defender.is_some()
    }

    /// The surviving piece of a combat, if exactly one survived.
    #[must_use]
    pub fn winning_piece(&self) -> Option<&Piece> {
        match self.battle? {
            BattleOutcome::AttackerWins => Some(&self.mover),
            BattleOutcome::DefenderWins => self.defender.as_ref(),
            BattleOutcome::BothDestroyed => None,
        }
    }

    /// The involved piece belonging to `side`.
    #[must_use]
    pub fn piece_of(&self, side: Side) -> Option<&Piece> {
        if self.mover.side() == side {
            Some(&self.mover)
        } else {
            self.defender.as_ref().filter(|d| d.side() == side)
        }
    }
}

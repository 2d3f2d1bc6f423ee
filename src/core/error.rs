//! Error types.
//!
//! Two classes are kept apart:
//! - [`RuleViolation`]: an ordinary rejected request (out of turn, out of
//!   bounds, friendly cell, ...). The board is unchanged and the caller is
//!   expected to ask again.
//! - [`SetupError`]: a caller defect while closing the spawn phase.
//!
//! [`SessionError`] wraps both for the game loop and adds engine defects.

use thiserror::Error;

use super::piece::PieceId;
use super::position::Position;
use super::rank::Rank;
use super::side::Side;

/// A spawn or move request the rules reject.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("{side} cannot act in the current phase")]
    WrongPhase { side: Side },
    #[error("{0} is off the board")]
    OutOfBounds(Position),
    #[error("{position} is outside {side}'s home rows")]
    OutsideHomeRows { side: Side, position: Position },
    #[error("{0} is already occupied")]
    CellOccupied(Position),
    #[error("{from} and {to} are not orthogonally adjacent")]
    NotAdjacent { from: Position, to: Position },
    #[error("{0} holds a friendly piece")]
    FriendlyFire(Position),
    #[error("{0} does not belong to the acting side")]
    NotYourPiece(PieceId),
    #[error("{0} is not in reserve")]
    PieceNotInReserve(PieceId),
    #[error("{0} is not on the board")]
    PieceNotOnBoard(PieceId),
    #[error("{piece} is not at {claimed}")]
    StalePosition { piece: PieceId, claimed: Position },
    #[error("{side} has no {rank} left in reserve")]
    NoReserve { side: Side, rank: Rank },
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),
    #[error("the game is over")]
    GameOver,
}

/// Closing the spawn phase failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("{side} still has {unplaced} unplaced pieces")]
    IncompleteSpawn { side: Side, unplaced: usize },
    #[error("{side} tried to confirm spawning outside its spawn phase")]
    WrongPhase { side: Side },
}

/// The game loop cannot continue.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0}'s engine is already thinking")]
    EngineBusy(Side),
    #[error("{side}'s engine proposed an illegal move: {violation}")]
    EngineMoveRejected { side: Side, violation: RuleViolation },
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error("the game is already over")]
    GameOver,
}

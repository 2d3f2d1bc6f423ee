//! Turn-takers.
//!
//! A side is played by an [`Actor`]. Actors only act through the board's
//! public API: they place pieces during their spawn phase and propose one
//! move per turn. The session applies the move and tells every actor what
//! happened.

mod ai;
mod human;

pub use ai::{AIController, ThinkState};
pub use human::{HumanController, HumanInput, HumanRequest};

use crate::board::{Board, BoardChange, MoveInfo};
use crate::core::{RuleViolation, SessionError, Side};

/// One side's player.
pub trait Actor {
    /// Side this actor plays.
    fn side(&self) -> Side;

    /// Place pieces during the actor's spawn phase.
    ///
    /// Returns `true` once the actor wants its spawn confirmed.
    fn perform_spawn(&mut self, board: &mut Board) -> bool;

    /// Propose a move for the current turn, `None` if none is ready.
    ///
    /// An error is a defect in the actor's own turn handling, not a
    /// rejected move.
    fn perform_move(&mut self, board: &Board) -> Result<Option<MoveInfo>, SessionError>;

    /// Called once when the move phase starts.
    fn begin_move_phase(&mut self, _board: &Board) {}

    /// Called after every applied move, whoever made it.
    fn observe(&mut self, _change: &BoardChange) {}

    /// Called when the board rejected this actor's move.
    fn move_rejected(&mut self, _mv: &MoveInfo, _violation: &RuleViolation) {}

    /// Whether rejected requests should be re-prompted rather than treated
    /// as a defect.
    fn is_interactive(&self) -> bool {
        false
    }
}

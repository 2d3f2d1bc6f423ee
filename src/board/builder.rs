//! Builder for boards set up mid-game.
//!
//! Skips the spawn phase: pieces go straight onto any cell, and pieces
//! that are never placed stay in reserve. Mostly used by tests, benches
//! and puzzles.

use crate::core::{Position, Rank, RuleViolation, Side};

use super::phase::Phase;
use super::state::Board;

/// Builder for a [`Board`] in an arbitrary position.
///
/// ## Example
///
/// ```
/// use generals::board::{BoardBuilder, Phase};
/// use generals::core::{Position, Rank, Side};
///
/// let board = BoardBuilder::new()
///     .place(Side::A, Rank::Flag, Position::new(4, 0))
///     .place(Side::B, Rank::Flag, Position::new(4, 7))
///     .place(Side::A, Rank::Spy, Position::new(4, 5))
///     .build()
///     .unwrap();
///
/// assert_eq!(board.phase(), Phase::Move(Side::A));
/// assert_eq!(board.legal_moves(Side::A).len(), 7);
/// ```
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    placements: Vec<(Side, Rank, Position)>,
    phase: Phase,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            phase: Phase::Move(Side::A),
        }
    }
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the next reserve piece of `rank` on `position`.
    pub fn place(mut self, side: Side, rank: Rank, position: Position) -> Self {
        self.placements.push((side, rank, position));
        self
    }

    /// Phase of the built board. Defaults to `Move(A)`.
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Build the board.
    ///
    /// Fails if a cell is used twice, a cell is off the board, or a side
    /// runs out of pieces of a rank.
    pub fn build(self) -> Result<Board, RuleViolation> {
        let mut board = Board::new();
        for (side, rank, position) in self.placements {
            let piece = board
                .army(side)
                .reserve_of_rank(rank)
                .ok_or(RuleViolation::NoReserve { side, rank })?;
            board.place_unchecked(piece, position)?;
        }
        board.set_phase(self.phase);
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_places_pieces() {
        let board = BoardBuilder::new()
            .place(Side::A, Rank::Private, Position::new(0, 4))
            .place(Side::A, Rank::Private, Position::new(1, 4))
            .phase(Phase::Move(Side::B))
            .build()
            .unwrap();

        assert_eq!(board.phase(), Phase::Move(Side::B));
        assert_eq!(board.army(Side::A).active_count(), 2);
        assert_eq!(board.piece_at(Position::new(1, 4)).and_then(|p| p.rank), Some(Rank::Private));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_build_rejects_exhausted_rank() {
        let result = BoardBuilder::new()
            .place(Side::B, Rank::Colonel, Position::new(0, 4))
            .place(Side::B, Rank::Colonel, Position::new(1, 4))
            .build();
        assert_eq!(
            result.unwrap_err(),
            RuleViolation::NoReserve { side: Side::B, rank: Rank::Colonel }
        );
    }

    #[test]
    fn test_build_rejects_shared_cell() {
        let result = BoardBuilder::new()
            .place(Side::A, Rank::Major, Position::new(3, 3))
            .place(Side::B, Rank::Major, Position::new(3, 3))
            .build();
        assert_eq!(result.unwrap_err(), RuleViolation::CellOccupied(Position::new(3, 3)));
    }
}

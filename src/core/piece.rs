//! Piece identity and per-piece state.
//!
//! ## ID Layout
//!
//! Every piece has a `PieceId` that stays valid for the whole game:
//! - `0..21`: side A's army
//! - `21..42`: side B's army
//!
//! The slot within an army follows the order of [`crate::core::rank::army`].

use serde::{Deserialize, Serialize};

use super::position::Position;
use super::rank::{Rank, ARMY_SIZE};
use super::side::Side;

/// Unique identifier of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Build an ID from the owning side and the slot within its army.
    #[must_use]
    pub const fn new(side: Side, slot: usize) -> Self {
        Self((side.index() * ARMY_SIZE + slot) as u8)
    }

    /// Owning side.
    #[must_use]
    pub const fn side(self) -> Side {
        if (self.0 as usize) < ARMY_SIZE {
            Side::A
        } else {
            Side::B
        }
    }

    /// Slot within the owning army.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize % ARMY_SIZE
    }

    /// Check if the id names a piece of either army.
    ///
    /// Ids past both armies still report side B and wrap their slot, so
    /// lookups must reject them.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < 2 * ARMY_SIZE
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.0)
    }
}

/// Lifecycle of a piece: reserve → alive → dead, never backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceStatus {
    /// Not yet placed on the board.
    Reserve,
    /// On the board.
    Alive,
    /// Captured.
    Dead,
}

/// A single piece.
///
/// `rank` is `None` only on hidden-information copies, where the opposing
/// army's ranks are scrubbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub rank: Option<Rank>,
    pub position: Option<Position>,
    pub status: PieceStatus,
}

impl Piece {
    /// A fresh reserve piece.
    #[must_use]
    pub const fn new(id: PieceId, rank: Rank) -> Self {
        Self {
            id,
            rank: Some(rank),
            position: None,
            status: PieceStatus::Reserve,
        }
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.id.side()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == PieceStatus::Alive
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.status == PieceStatus::Dead
    }

    /// Check if the rank is visible on this copy of the board.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.rank.is_some()
    }

    #[must_use]
    pub fn is_flag(&self) -> bool {
        self.rank == Some(Rank::Flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_layout() {
        let a0 = PieceId::new(Side::A, 0);
        let a20 = PieceId::new(Side::A, 20);
        let b0 = PieceId::new(Side::B, 0);
        let b20 = PieceId::new(Side::B, 20);

        assert_eq!(a0.0, 0);
        assert_eq!(a20.0, 20);
        assert_eq!(b0.0, 21);
        assert_eq!(b20.0, 41);

        assert_eq!(a20.side(), Side::A);
        assert_eq!(b0.side(), Side::B);
        assert_eq!(b20.slot(), 20);

        assert!(b20.is_valid());
        assert!(!PieceId(42).is_valid());
        assert!(!PieceId(135).is_valid());
    }

    #[test]
    fn test_new_piece_is_reserve() {
        let piece = Piece::new(PieceId::new(Side::B, 3), Rank::Major);
        assert_eq!(piece.status, PieceStatus::Reserve);
        assert_eq!(piece.position, None);
        assert_eq!(piece.side(), Side::B);
        assert!(piece.is_known());
        assert!(!piece.is_alive());
        assert!(!piece.is_flag());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PieceId(7)), "Piece(7)");
    }

    #[test]
    fn test_serialization() {
        let piece = Piece::new(PieceId(30), Rank::Flag);
        let json = serde_json::to_string(&piece).unwrap();
        let deserialized: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(piece, deserialized);
    }
}

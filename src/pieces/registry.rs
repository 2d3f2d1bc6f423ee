//! Per-side piece registry.
//!
//! The `PieceRegistry` owns one army and partitions it into:
//! - `active`: placed and alive
//! - `inactive`: still in reserve, or captured
//!
//! A piece moves inactive → active exactly once (spawn) and active →
//! inactive at most once (death). The registry also caches the army's Flag.
//!
//! Storage uses `im` vectors so cloning a board for search is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{army, Piece, PieceId, PieceStatus, Position, Rank, RuleViolation, Side, ARMY_SIZE};

/// One side's army.
///
/// ## Example
///
/// ```
/// use generals::core::{Position, Side};
/// use generals::pieces::PieceRegistry;
///
/// let mut registry = PieceRegistry::new(Side::A);
/// assert_eq!(registry.inactive_count(), 21);
///
/// let flag = registry.flag().unwrap().id;
/// registry.activate(flag, Position::new(4, 0)).unwrap();
/// assert_eq!(registry.active_count(), 1);
/// assert_eq!(registry.active_count() + registry.inactive_count(), 21);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRegistry {
    side: Side,
    /// All pieces, indexed by slot.
    pieces: Vector<Piece>,
    active: Vector<PieceId>,
    inactive: Vector<PieceId>,
    /// Cleared on hidden-information copies.
    flag: Option<PieceId>,
}

impl PieceRegistry {
    /// Create a full army in reserve.
    #[must_use]
    pub fn new(side: Side) -> Self {
        let pieces: Vector<Piece> = army()
            .into_iter()
            .enumerate()
            .map(|(slot, rank)| Piece::new(PieceId::new(side, slot), rank))
            .collect();

        let flag = pieces.iter().find(|p| p.is_flag()).map(|p| p.id);

        let inactive = pieces.iter().map(|p| p.id).collect();

        Self {
            side,
            pieces,
            active: Vector::new(),
            inactive,
            flag,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Look up a piece of this army.
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        if id.side() != self.side || !id.is_valid() {
            return None;
        }
        self.pieces.get(id.slot())
    }

    fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        if id.side() != self.side || !id.is_valid() {
            return None;
        }
        self.pieces.get_mut(id.slot())
    }

    /// Copy of a piece. `id` must belong to this army.
    pub(crate) fn snapshot(&self, id: PieceId) -> Piece {
        debug_assert_eq!(id.side(), self.side);
        self.pieces[id.slot()]
    }

    /// The army's Flag, dead or alive.
    ///
    /// `None` on a hidden-information copy of the opposing army.
    #[must_use]
    pub fn flag(&self) -> Option<&Piece> {
        self.flag.map(|id| &self.pieces[id.slot()])
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    /// Pieces still waiting to be placed.
    #[must_use]
    pub fn reserve_count(&self) -> usize {
        self.reserve().count()
    }

    /// Check if every piece has been placed.
    #[must_use]
    pub fn is_spawn_complete(&self) -> bool {
        self.inactive.iter().all(|&id| self.pieces[id.slot()].status != PieceStatus::Reserve)
    }

    /// Active pieces in activation order.
    pub fn active(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.active.iter().map(move |id| &self.pieces[id.slot()])
    }

    /// Inactive pieces: reserve and captured.
    pub fn inactive(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.inactive.iter().map(move |id| &self.pieces[id.slot()])
    }

    /// Pieces not yet placed.
    pub fn reserve(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.inactive().filter(|p| p.status == PieceStatus::Reserve)
    }

    /// Captured pieces.
    pub fn dead(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.inactive().filter(|p| p.is_dead())
    }

    /// Every piece: active first, then inactive.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.active().chain(self.inactive())
    }

    /// First reserve piece of the given rank.
    #[must_use]
    pub fn reserve_of_rank(&self, rank: Rank) -> Option<PieceId> {
        self.reserve().find(|p| p.rank == Some(rank)).map(|p| p.id)
    }

    /// Place a reserve piece on the board.
    pub fn activate(&mut self, id: PieceId, position: Position) -> Result<(), RuleViolation> {
        let piece = self.get(id).ok_or(RuleViolation::UnknownPiece(id))?;
        if piece.status != PieceStatus::Reserve {
            return Err(RuleViolation::PieceNotInReserve(id));
        }

        let index = self
            .inactive
            .iter()
            .position(|&p| p == id)
            .ok_or(RuleViolation::PieceNotInReserve(id))?;
        self.inactive.remove(index);
        self.active.push_back(id);

        if let Some(piece) = self.get_mut(id) {
            piece.status = PieceStatus::Alive;
            piece.position = Some(position);
        }

        self.debug_check_conservation();
        Ok(())
    }

    /// Update an active piece's position.
    pub(crate) fn relocate(&mut self, id: PieceId, position: Position) {
        match self.get_mut(id) {
            Some(piece) if piece.is_alive() => piece.position = Some(position),
            _ => {
                error!(piece = %id, "relocating a piece that is not on the board");
                debug_assert!(false, "relocating {id} which is not on the board");
            }
        }
    }

    /// Move an active piece to the graveyard.
    ///
    /// Returns `false` if the piece was not active; this signals a
    /// bookkeeping defect in the caller.
    pub fn kill(&mut self, id: PieceId) -> bool {
        let Some(index) = self.active.iter().position(|&p| p == id) else {
            error!(piece = %id, "killing a piece that is not active");
            debug_assert!(false, "killing {id} which is not active");
            return false;
        };

        self.active.remove(index);
        self.inactive.push_back(id);

        if let Some(piece) = self.get_mut(id) {
            piece.status = PieceStatus::Dead;
            piece.position = None;
        }

        self.debug_check_conservation();
        true
    }

    /// Hide every rank in this army, the Flag's identity included.
    pub(crate) fn scrub_ranks(&mut self) {
        for piece in self.pieces.iter_mut() {
            piece.rank = None;
        }
        self.flag = None;
    }

    fn debug_check_conservation(&self) {
        debug_assert_eq!(
            self.active.len() + self.inactive.len(),
            ARMY_SIZE,
            "{} lost track of a piece",
            self.side
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_all_reserve() {
        let registry = PieceRegistry::new(Side::B);

        assert_eq!(registry.side(), Side::B);
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.inactive_count(), ARMY_SIZE);
        assert_eq!(registry.reserve_count(), ARMY_SIZE);
        assert!(!registry.is_spawn_complete());
        let flag = registry.flag().unwrap();
        assert!(flag.is_flag());
        assert_eq!(flag.side(), Side::B);
    }

    #[test]
    fn test_get_rejects_other_side() {
        let registry = PieceRegistry::new(Side::A);
        assert!(registry.get(PieceId::new(Side::A, 5)).is_some());
        assert!(registry.get(PieceId::new(Side::B, 5)).is_none());
    }

    #[test]
    fn test_get_rejects_out_of_range_id() {
        let mut registry = PieceRegistry::new(Side::B);
        let bogus = PieceId(135);
        assert_eq!(bogus.side(), Side::B);
        assert!(registry.get(bogus).is_none());
        assert_eq!(
            registry.activate(bogus, Position::new(0, 5)),
            Err(RuleViolation::UnknownPiece(bogus))
        );
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn test_activate_once() {
        let mut registry = PieceRegistry::new(Side::A);
        let id = registry.reserve_of_rank(Rank::Major).unwrap();

        registry.activate(id, Position::new(1, 1)).unwrap();
        let piece = registry.get(id).unwrap();
        assert!(piece.is_alive());
        assert_eq!(piece.position, Some(Position::new(1, 1)));

        assert_eq!(
            registry.activate(id, Position::new(2, 1)),
            Err(RuleViolation::PieceNotInReserve(id))
        );
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_kill_moves_to_inactive() {
        let mut registry = PieceRegistry::new(Side::A);
        let id = registry.reserve_of_rank(Rank::Spy).unwrap();
        registry.activate(id, Position::new(0, 0)).unwrap();

        assert!(registry.kill(id));
        let piece = registry.get(id).unwrap();
        assert!(piece.is_dead());
        assert_eq!(piece.position, None);
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.inactive_count(), ARMY_SIZE);
        assert_eq!(registry.dead().count(), 1);
        assert_eq!(registry.reserve_count(), ARMY_SIZE - 1);
    }

    #[test]
    fn test_dead_piece_cannot_return() {
        let mut registry = PieceRegistry::new(Side::A);
        let id = registry.reserve_of_rank(Rank::Captain).unwrap();
        registry.activate(id, Position::new(0, 0)).unwrap();
        registry.kill(id);

        assert_eq!(
            registry.activate(id, Position::new(0, 0)),
            Err(RuleViolation::PieceNotInReserve(id))
        );
    }

    #[test]
    fn test_spawn_complete_after_all_placed() {
        let mut registry = PieceRegistry::new(Side::B);
        let ids: Vec<_> = registry.reserve().map(|p| p.id).collect();
        for (i, id) in ids.into_iter().enumerate() {
            let pos = Position::new((i % 9) as i8, 5 + (i / 9) as i8);
            registry.activate(id, pos).unwrap();
        }
        assert!(registry.is_spawn_complete());
        assert_eq!(registry.inactive_count(), 0);
    }

    #[test]
    fn test_iter_active_then_inactive() {
        let mut registry = PieceRegistry::new(Side::A);
        let flag = registry.flag().unwrap().id;
        registry.activate(flag, Position::new(4, 0)).unwrap();

        let first = registry.iter().next().unwrap();
        assert_eq!(first.id, flag);
        assert_eq!(registry.iter().count(), ARMY_SIZE);
    }

    #[test]
    fn test_scrub_ranks_hides_flag() {
        let mut registry = PieceRegistry::new(Side::B);
        registry.scrub_ranks();

        assert!(registry.iter().all(|p| p.rank.is_none()));
        assert!(registry.flag().is_none());
        assert_eq!(registry.iter().count(), ARMY_SIZE);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not active")]
    fn test_kill_reserve_piece_panics_in_debug() {
        let mut registry = PieceRegistry::new(Side::A);
        let id = registry.reserve_of_rank(Rank::Major).unwrap();
        registry.kill(id);
    }
}

//! The authoritative game board.
//!
//! ## Ownership
//!
//! Each side's [`PieceRegistry`] owns its pieces. The grid only stores
//! `PieceId`s, and the board keeps the two in step: a cell is occupied iff
//! the referenced piece is alive and its own position is that cell.
//!
//! ## Copies
//!
//! Grid and registries are `im` vectors, so `clone()` is O(1) and copies
//! never alias the original. Search works on
//! [`Board::copy_with_hidden_information`] snapshots and advances them with
//! [`Board::simulate`], which returns a new board.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, error, info};

use crate::core::{
    Direction, Piece, PieceId, Position, RuleViolation, SetupError, Side, SideMap, CELL_COUNT,
};
use crate::pieces::PieceRegistry;
use crate::rules::{enemy_baseline, in_home_rows, resolve, BattleOutcome};

use super::change::{BoardChange, MoveInfo, SpawnInfo};
use super::phase::Phase;

/// Board state: grid, both armies, phase and outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    grid: Vector<Option<PieceId>>,
    armies: SideMap<PieceRegistry>,
    phase: Phase,
    outcome: Option<Side>,
    last_change: Option<BoardChange>,
    /// Set on hidden-information copies: the side whose view this is.
    viewer: Option<Side>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Fresh game: empty grid, both armies in reserve, `Spawn(A)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: std::iter::repeat(None).take(CELL_COUNT).collect(),
            armies: SideMap::new(PieceRegistry::new),
            phase: Phase::default(),
            outcome: None,
            last_change: None,
            viewer: None,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side expected to act, `None` once the game is over.
    #[must_use]
    pub fn current_side(&self) -> Option<Side> {
        self.phase.side()
    }

    /// Winner, if the game has ended.
    #[must_use]
    pub fn check_outcome(&self) -> Option<Side> {
        self.outcome
    }

    #[must_use]
    pub fn last_change(&self) -> Option<&BoardChange> {
        self.last_change.as_ref()
    }

    /// Side this copy was scrubbed for, `None` on the authoritative board.
    #[must_use]
    pub fn viewer(&self) -> Option<Side> {
        self.viewer
    }

    #[must_use]
    pub fn army(&self, side: Side) -> &PieceRegistry {
        &self.armies[side]
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.armies[id.side()].get(id)
    }

    /// The piece standing on `position`, if any.
    #[must_use]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        if !position.in_bounds() {
            return None;
        }
        self.grid[position.cell_index()].and_then(|id| self.piece(id))
    }

    /// Enemy pieces orthogonally adjacent to `side`'s Flag.
    ///
    /// Always 0 when the Flag is hidden or off the board.
    #[must_use]
    pub fn flag_threats(&self, side: Side) -> usize {
        let Some(position) = self.armies[side].flag().and_then(|f| f.position) else {
            return 0;
        };
        position
            .neighbours()
            .into_iter()
            .filter(|&n| self.piece_at(n).is_some_and(|p| p.side() != side))
            .count()
    }

    // === Spawn phase ===

    /// Place a reserve piece of `side` on `target`.
    ///
    /// Valid only during `Spawn(side)`, inside the side's home rows, on an
    /// empty cell. On rejection the board is unchanged.
    pub fn spawn(&mut self, side: Side, piece: PieceId, target: Position) -> Result<(), RuleViolation> {
        if self.phase != Phase::Spawn(side) {
            debug!(%side, phase = %self.phase, "spawn rejected: out of turn");
            return Err(RuleViolation::WrongPhase { side });
        }
        if piece.side() != side {
            return Err(RuleViolation::NotYourPiece(piece));
        }
        if !target.in_bounds() {
            return Err(RuleViolation::OutOfBounds(target));
        }
        if !in_home_rows(side, target) {
            debug!(%side, %target, "spawn rejected: outside home rows");
            return Err(RuleViolation::OutsideHomeRows { side, position: target });
        }
        if self.grid[target.cell_index()].is_some() {
            return Err(RuleViolation::CellOccupied(target));
        }

        self.armies[side].activate(piece, target)?;
        self.grid.set(target.cell_index(), Some(piece));
        Ok(())
    }

    /// [`Board::spawn`] taking a request record.
    pub fn spawn_info(&mut self, side: Side, info: &SpawnInfo) -> Result<(), RuleViolation> {
        self.spawn(side, info.piece, info.target)
    }

    /// Close `side`'s spawn phase.
    ///
    /// Fails with [`SetupError::IncompleteSpawn`] while pieces remain in
    /// reserve. Confirming outside `Spawn(side)` is a caller defect and
    /// trips a debug assertion.
    pub fn confirm_spawn(&mut self, side: Side) -> Result<Phase, SetupError> {
        let next = match self.phase {
            Phase::Spawn(s) if s == side => self.phase.after_spawn(),
            _ => None,
        };
        let Some(next) = next else {
            error!(%side, phase = %self.phase, "spawn confirmed out of phase");
            debug_assert!(false, "{side} confirmed spawning during {}", self.phase);
            return Err(SetupError::WrongPhase { side });
        };

        if !self.armies[side].is_spawn_complete() {
            let unplaced = self.armies[side].reserve_count();
            debug!(%side, unplaced, "spawn confirmation refused");
            return Err(SetupError::IncompleteSpawn { side, unplaced });
        }

        self.phase = next;
        info!(%side, phase = %next, "spawn confirmed");
        Ok(next)
    }

    // === Move phase ===

    /// Legal moves of one piece in Up, Down, Left, Right order.
    #[must_use]
    pub fn piece_moves(&self, piece: &Piece) -> SmallVec<[MoveInfo; 4]> {
        let mut moves = SmallVec::new();
        let Some(from) = piece.position.filter(|_| piece.is_alive()) else {
            return moves;
        };

        for direction in Direction::ALL {
            let to = from.step(direction);
            if !to.in_bounds() {
                continue;
            }
            match self.piece_at(to) {
                Some(other) if other.side() == piece.side() => {}
                _ => moves.push(MoveInfo::new(piece.id, from, to)),
            }
        }
        moves
    }

    /// Every legal move for `side`: active pieces in registry order, each
    /// expanded Up, Down, Left, Right.
    ///
    /// Does not look at the phase, so search can ask for either side.
    #[must_use]
    pub fn legal_moves(&self, side: Side) -> Vec<MoveInfo> {
        self.armies[side]
            .active()
            .flat_map(|piece| self.piece_moves(piece))
            .collect()
    }

    /// Check a move against piece state and geometry, ignoring the phase.
    pub fn validate_move(&self, mv: &MoveInfo) -> Result<(), RuleViolation> {
        let piece = self.piece(mv.piece).ok_or(RuleViolation::UnknownPiece(mv.piece))?;
        if !piece.is_alive() {
            return Err(RuleViolation::PieceNotOnBoard(mv.piece));
        }
        if piece.position != Some(mv.from) {
            return Err(RuleViolation::StalePosition { piece: mv.piece, claimed: mv.from });
        }
        if !mv.to.in_bounds() {
            return Err(RuleViolation::OutOfBounds(mv.to));
        }
        if !mv.from.is_adjacent(mv.to) {
            return Err(RuleViolation::NotAdjacent { from: mv.from, to: mv.to });
        }
        if self.piece_at(mv.to).is_some_and(|other| other.side() == piece.side()) {
            return Err(RuleViolation::FriendlyFire(mv.to));
        }
        Ok(())
    }

    /// Apply a move for the side whose turn it is.
    ///
    /// Resolves combat when the target holds an enemy, checks for a winner
    /// and hands the turn over. On rejection the board is unchanged.
    ///
    /// # Panics
    ///
    /// When combat would need a rank this copy has hidden. Hidden copies
    /// are advanced with [`Board::simulate`] instead.
    pub fn apply_move(&mut self, mv: &MoveInfo) -> Result<BoardChange, RuleViolation> {
        let side = mv.side();
        if self.outcome.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if self.phase != Phase::Move(side) {
            debug!(%side, phase = %self.phase, "move rejected: out of turn");
            return Err(RuleViolation::WrongPhase { side });
        }
        if let Err(violation) = self.validate_move(mv) {
            debug!(%mv, %violation, "move rejected");
            return Err(violation);
        }

        let battle = self.piece_at(mv.to).map(|defender| self.known_battle(mv.piece, defender.id));
        let change = self.apply_resolved(mv, battle);
        debug_assert!(self.is_consistent(), "grid and registries diverged after {mv}");
        Ok(change)
    }

    /// A new board with `mv` applied, without touching `self`.
    ///
    /// Used by search: the phase is not checked, and `battle` supplies the
    /// assumed combat result when a rank is hidden. With `battle == None`
    /// combat is resolved from the visible ranks.
    ///
    /// # Panics
    ///
    /// When the target is occupied, `battle` is `None` and a rank is hidden.
    #[must_use]
    pub fn simulate(&self, mv: &MoveInfo, battle: Option<BattleOutcome>) -> Board {
        debug_assert_eq!(self.validate_move(mv), Ok(()), "simulating an illegal move");
        let mut next = self.clone();
        let battle = next
            .piece_at(mv.to)
            .map(|defender| battle.unwrap_or_else(|| next.known_battle(mv.piece, defender.id)));
        next.apply_resolved(mv, battle);
        next
    }

    /// A structurally independent copy in which every piece of the other
    /// side has its rank (and Flag identity) hidden.
    #[must_use]
    pub fn copy_with_hidden_information(&self, for_side: Side) -> Board {
        let mut copy = self.clone();
        copy.armies[for_side.opponent()].scrub_ranks();
        copy.viewer = Some(for_side);
        copy.last_change = None;
        copy
    }

    fn known_battle(&self, attacker: PieceId, defender: PieceId) -> BattleOutcome {
        let ranks = (
            self.piece(attacker).and_then(|p| p.rank),
            self.piece(defender).and_then(|p| p.rank),
        );
        match ranks {
            (Some(a), Some(d)) => resolve(a, d),
            _ => {
                error!(%attacker, %defender, "combat against a hidden rank");
                panic!("cannot resolve {attacker} vs {defender}: rank hidden on this copy");
            }
        }
    }

    /// Mutate grid and registries for a validated move.
    fn apply_resolved(&mut self, mv: &MoveInfo, battle: Option<BattleOutcome>) -> BoardChange {
        let side = mv.side();
        let defender = self.grid[mv.to.cell_index()];
        self.grid.set(mv.from.cell_index(), None);

        match (defender, battle) {
            (Some(defender), Some(BattleOutcome::AttackerWins)) => {
                self.armies[side.opponent()].kill(defender);
                self.occupy(mv.piece, mv.to);
            }
            (Some(_), Some(BattleOutcome::DefenderWins)) => {
                self.armies[side].kill(mv.piece);
            }
            (Some(defender), Some(BattleOutcome::BothDestroyed)) => {
                self.armies[side.opponent()].kill(defender);
                self.armies[side].kill(mv.piece);
                self.grid.set(mv.to.cell_index(), None);
            }
            _ => self.occupy(mv.piece, mv.to),
        }

        let change = BoardChange {
            mover: self.armies[side].snapshot(mv.piece),
            defender: defender.map(|id| self.armies[side.opponent()].snapshot(id)),
            from: mv.from,
            to: mv.to,
            battle: defender.and(battle),
            winner: defender.and(battle).and_then(|b| b.winner(side)),
        };
        if let Some(battle) = change.battle {
            debug!(attacker = %mv.piece, ?battle, winner = ?change.winner, "combat resolved");
        }

        self.last_change = Some(change);
        self.outcome = self.detect_outcome();
        self.phase = match self.outcome {
            Some(winner) => {
                if self.viewer.is_none() {
                    info!(%winner, "game over");
                }
                Phase::End
            }
            None => Phase::Move(side.opponent()),
        };
        change
    }

    fn occupy(&mut self, id: PieceId, to: Position) {
        self.armies[id.side()].relocate(id, to);
        self.grid.set(to.cell_index(), Some(id));
    }

    /// Flag capture first, then a Flag standing on the enemy baseline.
    fn detect_outcome(&self) -> Option<Side> {
        let captured = Side::ALL
            .into_iter()
            .find(|&side| self.armies[side.opponent()].flag().is_some_and(Piece::is_dead));
        captured.or_else(|| {
            Side::ALL.into_iter().find(|&side| {
                self.armies[side]
                    .flag()
                    .and_then(|f| f.position.filter(|_| f.is_alive()))
                    .is_some_and(|p| p.y == enemy_baseline(side))
            })
        })
    }

    /// Check that the grid and both registries agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let grid_ok = Position::all().all(|cell| match self.grid[cell.cell_index()] {
            Some(id) => self
                .piece(id)
                .is_some_and(|p| p.is_alive() && p.position == Some(cell)),
            None => true,
        });
        let pieces_ok = self.armies.iter().all(|(_, army)| {
            army.active_count() + army.inactive_count() == crate::core::ARMY_SIZE
                && army.active().all(|p| {
                    p.position
                        .is_some_and(|pos| self.grid[pos.cell_index()] == Some(p.id))
                })
                && army.inactive().all(|p| p.position.is_none())
        });
        grid_ok && pieces_ok
    }

    // === Construction helpers ===

    /// Put a reserve piece on any empty cell, ignoring phase and home rows.
    pub(crate) fn place_unchecked(&mut self, piece: PieceId, target: Position) -> Result<(), RuleViolation> {
        if !target.in_bounds() {
            return Err(RuleViolation::OutOfBounds(target));
        }
        if self.grid[target.cell_index()].is_some() {
            return Err(RuleViolation::CellOccupied(target));
        }
        self.armies[piece.side()].activate(piece, target)?;
        self.grid.set(target.cell_index(), Some(piece));
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, ARMY_SIZE};

    fn reserve(board: &Board, side: Side, rank: Rank) -> PieceId {
        board.army(side).reserve_of_rank(rank).unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.phase(), Phase::Spawn(Side::A));
        assert_eq!(board.current_side(), Some(Side::A));
        assert_eq!(board.check_outcome(), None);
        assert!(board.last_change().is_none());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_spawn_in_home_rows() {
        let mut board = Board::new();
        let flag = reserve(&board, Side::A, Rank::Flag);

        board.spawn(Side::A, flag, Position::new(4, 0)).unwrap();

        assert_eq!(board.piece_at(Position::new(4, 0)).map(|p| p.id), Some(flag));
        assert_eq!(board.army(Side::A).active_count(), 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_spawn_rejections_leave_board_unchanged() {
        let mut board = Board::new();
        let major = reserve(&board, Side::A, Rank::Major);
        let spy = reserve(&board, Side::A, Rank::Spy);
        let enemy = reserve(&board, Side::B, Rank::Major);
        board.spawn(Side::A, major, Position::new(0, 0)).unwrap();

        assert_eq!(
            board.spawn(Side::A, spy, Position::new(0, 3)),
            Err(RuleViolation::OutsideHomeRows { side: Side::A, position: Position::new(0, 3) })
        );
        assert_eq!(
            board.spawn(Side::A, spy, Position::new(0, 0)),
            Err(RuleViolation::CellOccupied(Position::new(0, 0)))
        );
        assert_eq!(
            board.spawn(Side::A, spy, Position::new(9, 0)),
            Err(RuleViolation::OutOfBounds(Position::new(9, 0)))
        );
        assert_eq!(
            board.spawn(Side::B, enemy, Position::new(0, 6)),
            Err(RuleViolation::WrongPhase { side: Side::B })
        );
        assert_eq!(
            board.spawn(Side::A, major, Position::new(1, 0)),
            Err(RuleViolation::PieceNotInReserve(major))
        );

        assert_eq!(board.army(Side::A).active_count(), 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_confirm_requires_full_spawn() {
        let mut board = Board::new();
        assert_eq!(
            board.confirm_spawn(Side::A),
            Err(SetupError::IncompleteSpawn { side: Side::A, unplaced: ARMY_SIZE })
        );
        assert_eq!(board.phase(), Phase::Spawn(Side::A));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "confirmed spawning")]
    fn test_confirm_out_of_phase_fails_loudly() {
        let mut board = Board::new();
        let _ = board.confirm_spawn(Side::B);
    }

    #[test]
    fn test_hidden_copy_is_independent() {
        let mut board = Board::new();
        let flag = reserve(&board, Side::A, Rank::Flag);
        board.spawn(Side::A, flag, Position::new(4, 0)).unwrap();

        let mut copy = board.copy_with_hidden_information(Side::B);

        assert_eq!(copy.viewer(), Some(Side::B));
        assert!(copy.army(Side::A).iter().all(|p| p.rank.is_none()));
        assert!(copy.army(Side::A).flag().is_none());
        assert!(copy.army(Side::B).iter().all(|p| p.rank.is_some()));
        assert_eq!(copy.piece_at(Position::new(4, 0)).map(|p| p.id), Some(flag));

        let b_flag = reserve(&copy, Side::B, Rank::Flag);
        copy.place_unchecked(b_flag, Position::new(4, 7)).unwrap();
        assert!(board.piece_at(Position::new(4, 7)).is_none());
        assert!(board.army(Side::A).iter().all(|p| p.rank.is_some()));
    }
}

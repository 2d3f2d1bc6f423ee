//! Beliefs about every opposing piece, tied together by the rank pool.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::board::{Board, BoardChange};
use crate::core::{PieceId, Rank, Side};

use super::belief::RankBelief;
use super::pool::RankPool;

/// Tracks what one side knows about the other side's ranks.
///
/// When a belief collapses the pool entry for its rank is decremented.
/// Once an entry reaches zero that rank is removed from every undetermined
/// belief, which can collapse further beliefs in turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BeliefTracker {
    opponent: Side,
    pool: RankPool,
    beliefs: FxHashMap<PieceId, RankBelief>,
}

impl BeliefTracker {
    /// Empty tracker for the pieces of `opponent`.
    #[must_use]
    pub fn new(opponent: Side) -> Self {
        Self {
            opponent,
            pool: RankPool::new(),
            beliefs: FxHashMap::default(),
        }
    }

    /// Tracker with a fresh belief for every piece `opponent` owns on `board`.
    #[must_use]
    pub fn from_board(board: &Board, opponent: Side) -> Self {
        let mut tracker = Self::new(opponent);
        for piece in board.army(opponent).iter() {
            tracker.track(piece.id);
        }
        debug!(%opponent, tracked = tracker.beliefs.len(), "belief tracking started");
        tracker
    }

    #[must_use]
    pub fn opponent(&self) -> Side {
        self.opponent
    }

    #[must_use]
    pub fn pool(&self) -> &RankPool {
        &self.pool
    }

    /// Start tracking a piece. Ranks the pool has exhausted are ruled out.
    pub fn track(&mut self, id: PieceId) {
        if id.side() != self.opponent || self.beliefs.contains_key(&id) {
            return;
        }
        let mut belief = RankBelief::new();
        let mut collapsed = None;
        for (rank, remaining) in self.pool.iter() {
            if remaining == 0 {
                collapsed = belief.remove(rank).or(collapsed);
            }
        }
        self.beliefs.insert(id, belief);
        if let Some(rank) = collapsed {
            self.settle(id, rank);
        }
    }

    /// Belief about a piece; a fresh belief if it is not tracked.
    #[must_use]
    pub fn belief(&self, id: PieceId) -> RankBelief {
        self.beliefs.get(&id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.beliefs.len()
    }

    /// Mean [`RankBelief::confidence`] over tracked pieces.
    #[must_use]
    pub fn average_confidence(&self) -> f32 {
        if self.beliefs.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.beliefs.values().map(RankBelief::confidence).sum();
        sum / self.beliefs.len() as f32
    }

    /// Learn from a combat between one of our pieces and a tracked piece.
    ///
    /// Only our own piece's rank is read. Plain steps are ignored.
    pub fn observe(&mut self, change: &BoardChange) {
        let me = self.opponent.opponent();
        let (Some(mine), Some(theirs)) = (change.piece_of(me), change.piece_of(self.opponent)) else {
            return;
        };
        let Some(my_rank) = mine.rank else {
            error!(piece = %mine.id, "own piece rank missing from a battle record");
            return;
        };

        let enemy = theirs.id;
        self.track(enemy);
        let Some(belief) = self.beliefs.get_mut(&enemy) else {
            return;
        };
        let collapsed = match change.winner {
            Some(winner) if winner == self.opponent => belief.won_battle(my_rank),
            Some(_) => belief.lost_battle(my_rank),
            None => belief.tied_battle(my_rank),
        };
        debug!(%enemy, %my_rank, winner = ?change.winner, possible = belief.possible().len(), "belief updated");

        if let Some(rank) = collapsed {
            self.settle(enemy, rank);
        }
    }

    /// Rule a rank out for one piece, propagating any collapse.
    pub fn eliminate(&mut self, id: PieceId, rank: Rank) {
        let collapsed = self.beliefs.get_mut(&id).and_then(|b| b.remove(rank));
        if let Some(rank) = collapsed {
            self.settle(id, rank);
        }
    }

    /// Account for a collapse and chase its consequences through the pool.
    fn settle(&mut self, id: PieceId, rank: Rank) {
        let mut pending = vec![(id, rank)];
        while let Some((id, rank)) = pending.pop() {
            debug!(piece = %id, %rank, "rank deduced");
            if self.pool.decrement(rank) > 0 {
                continue;
            }
            for (&other, belief) in self.beliefs.iter_mut() {
                if other == id || belief.is_determined() {
                    continue;
                }
                if let Some(next) = belief.remove(rank) {
                    pending.push((other, next));
                }
            }
        }
    }
}

//! Depth-limited expectimax move search.
//!
//! Every root move is scored by [`MoveSearch::evaluate`]:
//!
//! - A plain step is applied to the scratch board and scored by the
//!   continuation below it, plus `forward_bonus` when it advances.
//! - A capture splits on the chance of winning it. A certain loss
//!   (`<= 0.01`) is scored `-certain_loss_value` and not explored; a
//!   certain win (`>= 0.99`) only explores the winning branch. Otherwise
//!   both branches are explored and weighted by the chance.
//!
//! The continuation of a branch is the leaf heuristic for the mover minus
//! the *average* value of every reply the other side could make, searched
//! the same way one ply shallower. Averaging instead of minimising treats
//! the opponent as unmodelled. At depth 0 the leaf heuristic is returned
//! as is.
//!
//! Search runs on a hidden-information copy and never touches the
//! caller's board. No randomness is involved, so the same board and
//! beliefs always give the same move.

use std::time::Instant;

use tracing::{debug, trace};

use crate::board::{Board, MoveInfo, Phase};
use crate::core::Side;
use crate::inference::BeliefTracker;
use crate::rules::BattleOutcome;

use super::config::AIConfig;
use super::eval::{capture_odds, leaf_value};
use super::stats::SearchStats;

const CERTAIN_WIN: f32 = 0.99;
const CERTAIN_LOSS: f32 = 0.01;

/// Search context for one decision.
pub struct MoveSearch<'a> {
    config: &'a AIConfig,
    beliefs: &'a BeliefTracker,
    /// Side the search is choosing for.
    engine_side: Side,
    branches: Vec<(MoveInfo, f32)>,
    stats: SearchStats,
}

impl<'a> MoveSearch<'a> {
    /// Search context for the side whose pieces `beliefs` does not track.
    pub fn new(config: &'a AIConfig, beliefs: &'a BeliefTracker) -> Self {
        Self {
            config,
            beliefs,
            engine_side: beliefs.opponent().opponent(),
            branches: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Pick the best move for the engine side.
    ///
    /// Returns `None` when it is not the engine's turn or it has no legal
    /// move. Ties keep the first move in legal-move order.
    pub fn choose_move(&mut self, board: &Board) -> Option<MoveInfo> {
        let start = Instant::now();
        self.stats.reset();
        self.branches.clear();

        let side = self.engine_side;
        if board.phase() != Phase::Move(side) {
            debug!(%side, phase = %board.phase(), "search requested out of turn");
            return None;
        }

        let scratch = if board.viewer() == Some(side) {
            board.clone()
        } else {
            board.copy_with_hidden_information(side)
        };

        let mut best: Option<(MoveInfo, f32)> = None;
        for mv in scratch.legal_moves(side) {
            let value = self.evaluate(&scratch, &mv, self.config.max_depth);
            trace!(%mv, value, "root move");
            self.branches.push((mv, value));
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((mv, value));
            }
        }

        self.stats.root_moves = self.branches.len() as u32;
        self.stats.time_us = start.elapsed().as_micros() as u64;
        if let Some((mv, value)) = best {
            self.stats.best_value = value;
            debug!(
                %side,
                %mv,
                best_value = value,
                nodes = self.stats.nodes,
                pruned = self.stats.pruned,
                time_us = self.stats.time_us,
                confidence = self.beliefs.average_confidence(),
                "move chosen"
            );
        }
        best.map(|(mv, _)| mv)
    }

    /// Every root move of the last search with its expected value.
    #[must_use]
    pub fn branch_evals(&self) -> &[(MoveInfo, f32)] {
        &self.branches
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Expected value of `mv` for the side making it.
    pub fn evaluate(&mut self, board: &Board, mv: &MoveInfo, depth: u32) -> f32 {
        self.stats.nodes += 1;
        let side = mv.side();

        if board.piece_at(mv.to).is_none() {
            let next = board.simulate(mv, None);
            let continuation = self.continuation(&next, side, depth);
            return if depth > 0 && mv.advances() {
                continuation + self.config.forward_bonus
            } else {
                continuation
            };
        }

        let odds = capture_odds(board, mv, self.beliefs);
        if odds <= CERTAIN_LOSS {
            self.stats.pruned += 1;
            return -self.config.certain_loss_value;
        }

        let won = board.simulate(mv, Some(BattleOutcome::AttackerWins));
        let win_value = self.continuation(&won, side, depth) + self.config.winning_battle_bonus;
        if odds >= CERTAIN_WIN {
            return win_value;
        }

        let lost = board.simulate(mv, Some(BattleOutcome::DefenderWins));
        let loss_value = self.continuation(&lost, side, depth) - self.config.losing_battle_penalty;
        odds * win_value + (1.0 - odds) * loss_value
    }

    /// Value for `side` of the position after its move.
    fn continuation(&mut self, board: &Board, side: Side, depth: u32) -> f32 {
        if let Some(winner) = board.check_outcome() {
            return if winner == side {
                self.config.certain_loss_value
            } else {
                -self.config.certain_loss_value
            };
        }

        let leaf = leaf_value(board, side, self.engine_side, self.beliefs, self.config);
        if depth == 0 {
            return leaf;
        }
        leaf - self.average_reply(board, side.opponent(), depth - 1)
    }

    /// Mean value of every legal reply of `side`.
    fn average_reply(&mut self, board: &Board, side: Side, depth: u32) -> f32 {
        let replies = board.legal_moves(side);
        if replies.is_empty() {
            return 0.0;
        }
        let total: f32 = replies.iter().map(|mv| self.evaluate(board, mv, depth)).sum();
        total / replies.len() as f32
    }
}

/// Pick a move for the side to move on `board`.
///
/// `beliefs` must track that side's opponent.
#[must_use]
pub fn choose_move(board: &Board, beliefs: &BeliefTracker, config: &AIConfig) -> Option<MoveInfo> {
    MoveSearch::new(config, beliefs).choose_move(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::core::{Position, Rank};

    fn quiet_config() -> AIConfig {
        AIConfig::default()
            .with_max_depth(0)
            .with_weights(0.0, 0.0)
            .with_forward_bonus(0.0)
            .with_flag_at_risk(0.0)
    }

    #[test]
    fn test_out_of_turn_returns_none() {
        let board = BoardBuilder::new()
            .place(Side::B, Rank::Major, Position::new(4, 4))
            .phase(Phase::Move(Side::A))
            .build()
            .unwrap();
        let beliefs = BeliefTracker::new(Side::A);
        assert_eq!(choose_move(&board, &beliefs, &AIConfig::default()), None);
    }

    #[test]
    fn test_certain_loss_is_pruned() {
        // A known Private sits next to B's Spy; attacking it always loses.
        let board = BoardBuilder::new()
            .place(Side::A, Rank::Private, Position::new(4, 3))
            .place(Side::B, Rank::Spy, Position::new(4, 4))
            .phase(Phase::Move(Side::B))
            .build()
            .unwrap();
        let mut beliefs = BeliefTracker::from_board(&board, Side::A);
        let private = board.piece_at(Position::new(4, 3)).unwrap().id;
        for rank in Rank::ALL.into_iter().filter(|&r| r != Rank::Private) {
            beliefs.eliminate(private, rank);
        }

        let config = quiet_config();
        let mut search = MoveSearch::new(&config, &beliefs);
        let chosen = search.choose_move(&board).unwrap();

        assert_ne!(chosen.to, Position::new(4, 3));
        let attack = search
            .branch_evals()
            .iter()
            .find(|(mv, _)| mv.to == Position::new(4, 3))
            .unwrap();
        assert_eq!(attack.1, -config.certain_loss_value);
        assert_eq!(search.stats().pruned, 1);
    }

    #[test]
    fn test_certain_win_is_taken() {
        let board = BoardBuilder::new()
            .place(Side::A, Rank::Sergeant, Position::new(4, 3))
            .place(Side::B, Rank::General5, Position::new(4, 4))
            .phase(Phase::Move(Side::B))
            .build()
            .unwrap();
        let mut beliefs = BeliefTracker::from_board(&board, Side::A);
        let sergeant = board.piece_at(Position::new(4, 3)).unwrap().id;
        // Lost to our Captain earlier: Lieutenant or weaker, and not the Flag.
        for rank in [Rank::Spy, Rank::Flag] {
            beliefs.eliminate(sergeant, rank);
        }
        for rank in Rank::ALL.into_iter().filter(|&r| r <= Rank::Captain) {
            beliefs.eliminate(sergeant, rank);
        }

        let config = quiet_config().with_battle_terms(5.0, 5.0);
        let mut search = MoveSearch::new(&config, &beliefs);
        let chosen = search.choose_move(&board).unwrap();
        assert_eq!(chosen.to, Position::new(4, 3));
        assert_eq!(search.stats().best_value, 5.0);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let board = BoardBuilder::new()
            .place(Side::A, Rank::Flag, Position::new(0, 0))
            .place(Side::A, Rank::Colonel, Position::new(4, 3))
            .place(Side::B, Rank::Flag, Position::new(8, 7))
            .place(Side::B, Rank::Major, Position::new(4, 4))
            .phase(Phase::Move(Side::B))
            .build()
            .unwrap();
        let before = serde_json::to_string(&board).unwrap();
        let beliefs = BeliefTracker::from_board(&board, Side::A);

        let _ = choose_move(&board, &beliefs, &AIConfig::default().with_max_depth(2));

        assert_eq!(serde_json::to_string(&board).unwrap(), before);
        assert!(board.army(Side::A).iter().all(|p| p.rank.is_some()));
    }
}

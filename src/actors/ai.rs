//! Computer-controlled actor.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::ai::{choose_spawn_placements, AIConfig, MoveSearch, SearchStats};
use crate::board::{Board, BoardChange, MoveInfo};
use crate::core::{GameRng, RuleViolation, SessionError, Side};
use crate::inference::BeliefTracker;

use super::Actor;

/// Turn cycle of the engine: `Idle -> Thinking -> Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThinkState {
    Idle,
    /// A decision has been requested and not yet collected.
    Thinking,
}

/// Plays a side with the spawn heuristic and the move search.
///
/// The engine is not reentrant: [`AIController::begin_turn`] fails while a
/// previous decision is still pending.
#[derive(Clone, Debug)]
pub struct AIController {
    side: Side,
    config: AIConfig,
    rng: GameRng,
    beliefs: BeliefTracker,
    state: ThinkState,
    pending: Option<MoveInfo>,
    last_stats: SearchStats,
}

impl AIController {
    pub fn new(side: Side, config: AIConfig, rng: GameRng) -> Self {
        Self {
            side,
            config,
            rng,
            beliefs: BeliefTracker::new(side.opponent()),
            state: ThinkState::Idle,
            pending: None,
            last_stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ThinkState {
        self.state
    }

    #[must_use]
    pub fn beliefs(&self) -> &BeliefTracker {
        &self.beliefs
    }

    #[must_use]
    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    /// Statistics of the most recent search.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        &self.last_stats
    }

    /// Start deciding a move for `board`.
    pub fn begin_turn(&mut self, board: &Board) -> Result<(), SessionError> {
        if self.state == ThinkState::Thinking {
            error!(side = %self.side, "decision requested while thinking");
            return Err(SessionError::EngineBusy(self.side));
        }
        self.state = ThinkState::Thinking;

        let mut search = MoveSearch::new(&self.config, &self.beliefs);
        self.pending = search.choose_move(board);
        self.last_stats = search.stats().clone();
        Ok(())
    }

    /// Collect the decision and go back to idle.
    pub fn take_move(&mut self) -> Option<MoveInfo> {
        self.state = ThinkState::Idle;
        self.pending.take()
    }
}

impl Actor for AIController {
    fn side(&self) -> Side {
        self.side
    }

    fn perform_spawn(&mut self, board: &mut Board) -> bool {
        let placements = choose_spawn_placements(self.side, board, &self.config.spawn, &mut self.rng);
        for spawn in &placements {
            if let Err(violation) = board.spawn_info(self.side, spawn) {
                error!(side = %self.side, %violation, "heuristic spawn rejected");
            }
        }
        true
    }

    fn perform_move(&mut self, board: &Board) -> Result<Option<MoveInfo>, SessionError> {
        self.begin_turn(board)?;
        Ok(self.take_move())
    }

    fn begin_move_phase(&mut self, board: &Board) {
        self.beliefs = BeliefTracker::from_board(board, self.side.opponent());
    }

    fn observe(&mut self, change: &BoardChange) {
        self.beliefs.observe(change);
    }

    fn move_rejected(&mut self, mv: &MoveInfo, violation: &RuleViolation) {
        debug!(side = %self.side, %mv, %violation, "engine move rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Phase};
    use crate::core::{Position, Rank};

    fn board() -> Board {
        BoardBuilder::new()
            .place(Side::A, Rank::Flag, Position::new(0, 0))
            .place(Side::A, Rank::Major, Position::new(4, 3))
            .place(Side::B, Rank::Flag, Position::new(8, 7))
            .place(Side::B, Rank::Colonel, Position::new(4, 5))
            .phase(Phase::Move(Side::B))
            .build()
            .unwrap()
    }

    #[test]
    fn test_turn_cycle() {
        let board = board();
        let mut ai = AIController::new(Side::B, AIConfig::default().with_max_depth(1), GameRng::new(0));
        ai.begin_move_phase(&board);
        assert_eq!(ai.state(), ThinkState::Idle);

        ai.begin_turn(&board).unwrap();
        assert_eq!(ai.state(), ThinkState::Thinking);
        assert_eq!(ai.begin_turn(&board), Err(SessionError::EngineBusy(Side::B)));

        let mv = ai.take_move().unwrap();
        assert_eq!(mv.side(), Side::B);
        assert_eq!(ai.state(), ThinkState::Idle);
        assert!(ai.last_stats().nodes > 0);
    }

    #[test]
    fn test_busy_engine_reports_instead_of_waiting() {
        let board = board();
        let mut ai = AIController::new(Side::B, AIConfig::default().with_max_depth(0), GameRng::new(0));
        ai.begin_move_phase(&board);
        ai.begin_turn(&board).unwrap();

        assert_eq!(ai.perform_move(&board), Err(SessionError::EngineBusy(Side::B)));
        assert_eq!(ai.state(), ThinkState::Thinking);

        ai.take_move();
        assert!(matches!(ai.perform_move(&board), Ok(Some(_))));
        assert_eq!(ai.state(), ThinkState::Idle);
    }

    #[test]
    fn test_spawn_places_whole_army() {
        let mut board = Board::new();
        let mut ai = AIController::new(Side::A, AIConfig::default(), GameRng::new(4));
        assert!(ai.perform_spawn(&mut board));
        assert!(board.army(Side::A).is_spawn_complete());
        assert!(board.confirm_spawn(Side::A).is_ok());
    }

    #[test]
    fn test_tracks_the_opponent() {
        let board = board();
        let mut ai = AIController::new(Side::B, AIConfig::default(), GameRng::new(0));
        ai.begin_move_phase(&board);
        assert_eq!(ai.beliefs().opponent(), Side::A);
        assert_eq!(ai.beliefs().tracked(), 21);
    }
}

//! The game loop.
//!
//! `GameSession` owns the authoritative board and one actor per side. Each
//! [`GameSession::step`] asks the side to act for one request:
//!
//! 1. `Spawn(side)`: the actor places pieces; once it asks, the spawn is
//!    confirmed. Entering the move phase starts belief tracking.
//! 2. `Move(side)`: the actor proposes a move. An applied move is shown to
//!    both actors; a rejected one is handed back to an interactive actor
//!    and is an error for an engine.
//! 3. `End`: nothing left to do.
//!
//! Phase changes are reported to an optional listener registered with
//! [`GameSession::with_phase_listener`].

use tracing::{debug, info, warn};

use crate::actors::{AIController, Actor};
use crate::ai::AIConfig;
use crate::board::{Board, BoardChange, Phase};
use crate::core::{GameRng, RuleViolation, SessionError, SetupError, Side, SideMap};

/// Result of one [`GameSession::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The side's spawn was confirmed.
    SpawnConfirmed(Side),
    /// A move was applied.
    Applied(BoardChange),
    /// An interactive actor's request was rejected; ask it again.
    Rejected { side: Side, violation: RuleViolation },
    /// The side has nothing to submit yet.
    AwaitingInput(Side),
    /// The game is over.
    Finished(Side),
}

type PhaseListener = Box<dyn FnMut(Phase)>;

/// One game between two actors.
pub struct GameSession {
    board: Board,
    actors: SideMap<Box<dyn Actor>>,
    listener: Option<PhaseListener>,
    moves_played: usize,
}

impl GameSession {
    /// Create a session. Actors must play the side they are given for.
    pub fn new(actor_a: Box<dyn Actor>, actor_b: Box<dyn Actor>) -> Self {
        debug_assert_eq!(actor_a.side(), Side::A, "first actor must play side A");
        debug_assert_eq!(actor_b.side(), Side::B, "second actor must play side B");
        Self {
            board: Board::new(),
            actors: SideMap::from_pair(actor_a, actor_b),
            listener: None,
            moves_played: 0,
        }
    }

    /// Two engines with the same configuration, seeded from `seed`.
    pub fn engine_match(config: AIConfig, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let a = AIController::new(Side::A, config.clone(), rng.fork());
        let b = AIController::new(Side::B, config, rng.fork());
        Self::new(Box::new(a), Box::new(b))
    }

    /// Register a callback for every phase change.
    pub fn with_phase_listener(mut self, listener: impl FnMut(Phase) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn actor(&self, side: Side) -> &dyn Actor {
        self.actors[side].as_ref()
    }

    #[must_use]
    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Advance the game by one request.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        match self.board.phase() {
            Phase::Spawn(side) => self.spawn_step(side),
            Phase::Move(side) => self.move_step(side),
            Phase::End => Err(SessionError::GameOver),
        }
    }

    /// Run both spawn phases to completion.
    pub fn run_spawn(&mut self) -> Result<(), SessionError> {
        while self.board.phase().is_spawn() {
            match self.step()? {
                StepOutcome::SpawnConfirmed(_) | StepOutcome::Rejected { .. } => {}
                StepOutcome::AwaitingInput(side) => {
                    return Err(SetupError::IncompleteSpawn {
                        side,
                        unplaced: self.board.army(side).reserve_count(),
                    }
                    .into());
                }
                StepOutcome::Applied(_) | StepOutcome::Finished(_) => {}
            }
        }
        Ok(())
    }

    /// Play until a side wins, an actor waits for input, or `max_moves`
    /// moves have been applied. Returns the winner, if any.
    pub fn play(&mut self, max_moves: usize) -> Result<Option<Side>, SessionError> {
        while self.moves_played < max_moves {
            match self.step()? {
                StepOutcome::Finished(winner) => return Ok(Some(winner)),
                StepOutcome::AwaitingInput(side) => {
                    debug!(%side, "waiting for input");
                    return Ok(None);
                }
                _ => {}
            }
        }
        if self.board.check_outcome().is_none() {
            warn!(max_moves, "move cap reached without a winner");
        }
        Ok(self.board.check_outcome())
    }

    fn spawn_step(&mut self, side: Side) -> Result<StepOutcome, SessionError> {
        if !self.actors[side].perform_spawn(&mut self.board) {
            return Ok(StepOutcome::AwaitingInput(side));
        }

        match self.board.confirm_spawn(side) {
            Ok(phase) => {
                if phase.is_move() {
                    for actor in [Side::A, Side::B] {
                        self.actors[actor].begin_move_phase(&self.board);
                    }
                    info!("move phase started");
                }
                self.notify(phase);
                Ok(StepOutcome::SpawnConfirmed(side))
            }
            Err(err) if self.actors[side].is_interactive() => {
                debug!(%side, %err, "spawn not ready");
                Ok(StepOutcome::AwaitingInput(side))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn move_step(&mut self, side: Side) -> Result<StepOutcome, SessionError> {
        let Some(mv) = self.actors[side].perform_move(&self.board)? else {
            return Ok(StepOutcome::AwaitingInput(side));
        };

        match self.board.apply_move(&mv) {
            Ok(change) => {
                self.moves_played += 1;
                for actor in [Side::A, Side::B] {
                    self.actors[actor].observe(&change);
                }
                let phase = self.board.phase();
                self.notify(phase);
                match self.board.check_outcome() {
                    Some(winner) => Ok(StepOutcome::Finished(winner)),
                    None => Ok(StepOutcome::Applied(change)),
                }
            }
            Err(violation) => {
                self.actors[side].move_rejected(&mv, &violation);
                if self.actors[side].is_interactive() {
                    Ok(StepOutcome::Rejected { side, violation })
                } else {
                    Err(SessionError::EngineMoveRejected { side, violation })
                }
            }
        }
    }

    fn notify(&mut self, phase: Phase) {
        if let Some(listener) = self.listener.as_mut() {
            listener(phase);
        }
    }
}

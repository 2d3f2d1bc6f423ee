//! Actor fed by an external input layer.
//!
//! [`HumanController::new`] returns the actor together with a
//! [`HumanInput`] handle. The input layer sends requests through the handle
//! and reads back the ones the board rejected; the session drives the
//! actor.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::debug;

use crate::ai::random_spawn_placements;
use crate::board::{Board, MoveInfo, SpawnInfo};
use crate::core::{GameRng, RuleViolation, SessionError, Side};

use super::Actor;

/// A request from the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HumanRequest {
    Spawn(SpawnInfo),
    /// Place every reserve piece on a shuffled home cell.
    RandomSpawn,
    ConfirmSpawn,
    Move(MoveInfo),
}

/// Input side of a [`HumanController`].
#[derive(Debug)]
pub struct HumanInput {
    requests: Sender<HumanRequest>,
    rejections: Receiver<RuleViolation>,
}

impl HumanInput {
    /// Send a request. Returns `false` once the actor is gone.
    pub fn send(&self, request: HumanRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    pub fn spawn(&self, spawn: SpawnInfo) -> bool {
        self.send(HumanRequest::Spawn(spawn))
    }

    pub fn confirm_spawn(&self) -> bool {
        self.send(HumanRequest::ConfirmSpawn)
    }

    pub fn move_piece(&self, mv: MoveInfo) -> bool {
        self.send(HumanRequest::Move(mv))
    }

    /// Rejections since the last call, oldest first.
    pub fn rejections(&self) -> Vec<RuleViolation> {
        self.rejections.try_iter().collect()
    }
}

/// Relays input-layer requests to the board.
#[derive(Debug)]
pub struct HumanController {
    side: Side,
    rng: GameRng,
    requests: Receiver<HumanRequest>,
    rejections: Sender<RuleViolation>,
    /// A move received during the spawn phase, or vice versa, waits here.
    deferred: Option<HumanRequest>,
}

impl HumanController {
    /// The actor and its input handle. `rng` drives random spawns.
    pub fn new(side: Side, rng: GameRng) -> (Self, HumanInput) {
        let (request_tx, request_rx) = mpsc::channel();
        let (reject_tx, reject_rx) = mpsc::channel();
        let controller = Self {
            side,
            rng,
            requests: request_rx,
            rejections: reject_tx,
            deferred: None,
        };
        let input = HumanInput {
            requests: request_tx,
            rejections: reject_rx,
        };
        (controller, input)
    }

    fn next_request(&mut self) -> Option<HumanRequest> {
        self.deferred.take().or_else(|| self.requests.try_recv().ok())
    }

    fn reject(&self, violation: RuleViolation) {
        debug!(side = %self.side, %violation, "request rejected");
        // The input layer may have gone away; nothing to report to then.
        let _ = self.rejections.send(violation);
    }
}

impl Actor for HumanController {
    fn side(&self) -> Side {
        self.side
    }

    fn perform_spawn(&mut self, board: &mut Board) -> bool {
        while let Some(request) = self.next_request() {
            match request {
                HumanRequest::Spawn(spawn) => {
                    if let Err(violation) = board.spawn_info(self.side, &spawn) {
                        self.reject(violation);
                    }
                }
                HumanRequest::RandomSpawn => {
                    for spawn in random_spawn_placements(self.side, board, &mut self.rng) {
                        if let Err(violation) = board.spawn_info(self.side, &spawn) {
                            self.reject(violation);
                        }
                    }
                }
                HumanRequest::ConfirmSpawn => return true,
                HumanRequest::Move(_) => {
                    self.deferred = Some(request);
                    return false;
                }
            }
        }
        false
    }

    fn perform_move(&mut self, _board: &Board) -> Result<Option<MoveInfo>, SessionError> {
        while let Some(request) = self.next_request() {
            match request {
                HumanRequest::Move(mv) => return Ok(Some(mv)),
                _ => self.reject(RuleViolation::WrongPhase { side: self.side }),
            }
        }
        Ok(None)
    }

    fn move_rejected(&mut self, _mv: &MoveInfo, violation: &RuleViolation) {
        self.reject(violation.clone());
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

//! # generals
//!
//! Rules engine and computer opponent for the Game of the Generals, a
//! two-player hidden-information board game in the Stratego family.
//!
//! ## Design Principles
//!
//! 1. **One authoritative board**: the [`Board`] owns both armies and
//!    validates every spawn and move. Rejected requests leave it untouched.
//!
//! 2. **Hidden information is scrubbed, not trusted**: the engine searches
//!    on [`Board::copy_with_hidden_information`] copies and learns enemy
//!    ranks only from the battles it sees.
//!
//! 3. **Configuration over constants**: every search weight and spawn
//!    probability lives in [`AIConfig`], and every random decision draws
//!    from an injected [`GameRng`].
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: grid and registries use `im` vectors,
//!   so copying a board for search is O(1).
//!
//! - **Expectimax**: the engine maximises its own value and averages the
//!   opponent's replies instead of assuming the worst.
//!
//! ## Modules
//!
//! - `core`: sides, positions, ranks, pieces, RNG, errors
//! - `rules`: combat table and home-row geometry
//! - `pieces`: per-side piece registry
//! - `board`: the board state machine
//! - `inference`: rank beliefs about opposing pieces
//! - `ai`: spawn heuristic and move search
//! - `actors`: human and computer turn-takers
//! - `session`: the game loop

pub mod actors;
pub mod ai;
pub mod board;
pub mod core;
pub mod inference;
pub mod pieces;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    GameRng, Piece, PieceId, PieceStatus, Position, Rank, RankSet, RuleViolation, SessionError,
    SetupError, Side, SideMap,
};

pub use crate::rules::{resolve, BattleOutcome};

pub use crate::pieces::PieceRegistry;

pub use crate::board::{Board, BoardBuilder, BoardChange, MoveInfo, Phase, SpawnInfo};

pub use crate::inference::{BeliefTracker, RankBelief, RankPool};

pub use crate::ai::{
    choose_move, choose_spawn_placements, random_spawn_placements, AIConfig, MoveSearch,
    SearchStats, SpawnConfig,
};

pub use crate::actors::{AIController, Actor, HumanController, HumanInput, HumanRequest};

pub use crate::session::{GameSession, StepOutcome};

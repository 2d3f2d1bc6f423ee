//! Decision engine for a computer-controlled side.
//!
//! ## Overview
//!
//! - **Spawn**: [`choose_spawn_placements`] lays out an army around a
//!   guarded Flag; [`random_spawn_placements`] scatters it instead.
//! - **Moves**: [`MoveSearch`] runs a depth-limited expectimax over a
//!   hidden-information copy of the board, using a [`BeliefTracker`] for
//!   the odds of every capture.
//!
//! ## Usage
//!
//! ```rust
//! use generals::ai::{choose_move, AIConfig};
//! use generals::board::{BoardBuilder, Phase};
//! use generals::core::{Position, Rank, Side};
//! use generals::inference::BeliefTracker;
//!
//! let board = BoardBuilder::new()
//!     .place(Side::A, Rank::Major, Position::new(4, 3))
//!     .place(Side::B, Rank::General5, Position::new(4, 4))
//!     .phase(Phase::Move(Side::B))
//!     .build()
//!     .unwrap();
//! let beliefs = BeliefTracker::from_board(&board, Side::A);
//!
//! let config = AIConfig::default().with_max_depth(1);
//! let mv = choose_move(&board, &beliefs, &config).unwrap();
//! assert_eq!(mv.from, Position::new(4, 4));
//! ```
//!
//! [`BeliefTracker`]: crate::inference::BeliefTracker

pub mod config;
pub mod eval;
pub mod search;
pub mod spawn;
pub mod stats;

pub use config::{AIConfig, SpawnConfig};
pub use eval::{capture_odds, leaf_value};
pub use search::{choose_move, MoveSearch};
pub use spawn::{choose_spawn_placements, flank_of, random_spawn_placements, FlankStrategy};
pub use stats::SearchStats;

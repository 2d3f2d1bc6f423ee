//! Core types: sides, geometry, ranks, pieces, RNG, errors.
//!
//! Everything here is plain data with no knowledge of game phases; the
//! board and the AI build on top of it.

pub mod error;
pub mod piece;
pub mod position;
pub mod rank;
pub mod rng;
pub mod side;

pub use error::{RuleViolation, SessionError, SetupError};
pub use piece::{Piece, PieceId, PieceStatus};
pub use position::{Direction, Position, CELL_COUNT, HEIGHT, WIDTH};
pub use rank::{army, Rank, RankSet, ARMY_SIZE, RANK_COUNT};
pub use rng::GameRng;
pub use side::{Side, SideMap};

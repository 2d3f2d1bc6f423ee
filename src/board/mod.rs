//! The board: grid, armies, phases and move application.

mod builder;
mod change;
mod phase;
mod state;

pub use builder::BoardBuilder;
pub use change::{BoardChange, MoveInfo, SpawnInfo};
pub use phase::Phase;
pub use state::Board;

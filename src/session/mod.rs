//! Driving a full game between two actors.

mod game;

pub use game::{GameSession, StepOutcome};

//! Game rules that do not depend on board state: the combat table and
//! side territory.

pub mod combat;
pub mod territory;

pub use combat::{resolve, BattleOutcome};
pub use territory::{back_row, enemy_baseline, home_cells, home_rows, in_home_rows};

//! Combat resolution.
//!
//! | Attacker vs defender | Result |
//! |---|---|
//! | Flag vs Flag | attacker wins |
//! | Spy vs Private | defender wins |
//! | Private vs Spy | attacker wins |
//! | Spy vs anything else | attacker wins (and symmetrically as defender) |
//! | equal ranks | both destroyed |
//! | otherwise | lower ordinal wins |

use serde::{Deserialize, Serialize};

use crate::core::{Rank, Side};

/// Result of one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    AttackerWins,
    DefenderWins,
    /// Both pieces are removed.
    BothDestroyed,
}

impl BattleOutcome {
    /// The same battle seen with the roles swapped.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            BattleOutcome::AttackerWins => BattleOutcome::DefenderWins,
            BattleOutcome::DefenderWins => BattleOutcome::AttackerWins,
            BattleOutcome::BothDestroyed => BattleOutcome::BothDestroyed,
        }
    }

    /// Winning side given which side attacked, `None` on a mutual kill.
    #[must_use]
    pub const fn winner(self, attacker: Side) -> Option<Side> {
        match self {
            BattleOutcome::AttackerWins => Some(attacker),
            BattleOutcome::DefenderWins => Some(attacker.opponent()),
            BattleOutcome::BothDestroyed => None,
        }
    }
}

/// Resolve a battle between two ranks.
///
/// Pure function of the two ranks; swapping them swaps the result except
/// for Flag vs Flag, which the attacker always wins.
///
/// ```
/// use generals::core::Rank;
/// use generals::rules::{resolve, BattleOutcome};
///
/// assert_eq!(resolve(Rank::Spy, Rank::Private), BattleOutcome::DefenderWins);
/// assert_eq!(resolve(Rank::Private, Rank::Spy), BattleOutcome::AttackerWins);
/// assert_eq!(resolve(Rank::Flag, Rank::Flag), BattleOutcome::AttackerWins);
/// ```
#[must_use]
pub fn resolve(attacker: Rank, defender: Rank) -> BattleOutcome {
    match (attacker, defender) {
        (Rank::Flag, Rank::Flag) => BattleOutcome::AttackerWins,
        (Rank::Spy, Rank::Private) => BattleOutcome::DefenderWins,
        (Rank::Private, Rank::Spy) => BattleOutcome::AttackerWins,
        (a, d) if a == d => BattleOutcome::BothDestroyed,
        (a, d) if a < d => BattleOutcome::AttackerWins,
        _ => BattleOutcome::DefenderWins,
    }
}

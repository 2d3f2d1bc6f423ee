//! What one opposing piece could still be.

use serde::{Deserialize, Serialize};

use crate::core::{Rank, RankSet, RANK_COUNT};
use crate::rules::{resolve, BattleOutcome};

/// Possibility set for one opposing piece.
///
/// Starts with every rank and only ever shrinks. Once a single rank is
/// left it is recorded as `guaranteed`.
///
/// The battle methods only narrow the set; the shared pool bookkeeping
/// lives in [`super::BeliefTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBelief {
    possible: RankSet,
    guaranteed: Option<Rank>,
}

impl Default for RankBelief {
    fn default() -> Self {
        Self::new()
    }
}

impl RankBelief {
    #[must_use]
    pub fn new() -> Self {
        Self {
            possible: RankSet::all(),
            guaranteed: None,
        }
    }

    #[must_use]
    pub fn possible(&self) -> RankSet {
        self.possible
    }

    #[must_use]
    pub fn guaranteed(&self) -> Option<Rank> {
        self.guaranteed
    }

    #[must_use]
    pub fn is_determined(&self) -> bool {
        self.guaranteed.is_some()
    }

    /// The tracked piece beat our piece of `my_rank`.
    ///
    /// Returns the rank the set collapsed to, if this call collapsed it.
    pub fn won_battle(&mut self, my_rank: Rank) -> Option<Rank> {
        match my_rank {
            Rank::Spy => self.restrict(RankSet::single(Rank::Private)),
            // A Spy never beats a Private.
            Rank::Private => self.restrict(RankSet::from_ranks(
                Rank::ALL.into_iter().filter(|&r| r < Rank::Private && r != Rank::Spy),
            )),
            // Anything takes a Flag, the other Flag included when attacking.
            Rank::Flag => None,
            _ => self.restrict(RankSet::from_ranks(Rank::ALL.into_iter().filter(|&r| r < my_rank))),
        }
    }

    /// Our piece of `my_rank` beat the tracked piece.
    pub fn lost_battle(&mut self, my_rank: Rank) -> Option<Rank> {
        match my_rank {
            Rank::Spy => self.restrict(RankSet::from_ranks(
                Rank::ALL.into_iter().filter(|&r| r != Rank::Spy && r != Rank::Private),
            )),
            // A Private beats only the Spy and the Flag.
            Rank::Private => self.restrict(RankSet::from_ranks([Rank::Spy, Rank::Flag])),
            // A Flag only wins against the other Flag.
            Rank::Flag => self.restrict(RankSet::single(Rank::Flag)),
            _ => self.restrict(RankSet::from_ranks(Rank::ALL.into_iter().filter(|&r| r > my_rank))),
        }
    }

    /// Both pieces died: the tracked piece had `my_rank`.
    pub fn tied_battle(&mut self, my_rank: Rank) -> Option<Rank> {
        self.restrict(RankSet::single(my_rank))
    }

    /// Drop one rank. Removing an absent rank is a no-op.
    pub fn remove(&mut self, rank: Rank) -> Option<Rank> {
        if !self.possible.contains(rank) {
            return None;
        }
        let mut allowed = RankSet::all();
        allowed.remove(rank);
        self.restrict(allowed)
    }

    /// Chance that our `my_rank` beats the tracked piece when attacking it.
    ///
    /// Uniform over the remaining possibilities. Ties count as failures.
    #[must_use]
    pub fn win_chance(&self, my_rank: Rank) -> f32 {
        self.fraction(|r| resolve(my_rank, r) == BattleOutcome::AttackerWins)
    }

    /// Chance that the tracked piece beats our `defender` when attacking it.
    #[must_use]
    pub fn attack_success_chance(&self, defender: Rank) -> f32 {
        self.fraction(|r| resolve(r, defender) == BattleOutcome::AttackerWins)
    }

    /// `0.0` with every rank open, `1.0 - 1/15` once determined.
    #[must_use]
    pub fn confidence(&self) -> f32 {
        1.0 - self.possible.len() as f32 / RANK_COUNT as f32
    }

    fn fraction(&self, wins: impl Fn(Rank) -> bool) -> f32 {
        let total = self.possible.len();
        if total == 0 {
            return 0.0;
        }
        let hits = self.possible.iter().filter(|&r| wins(r)).count();
        hits as f32 / total as f32
    }

    /// Intersect with `allowed`; returns the newly guaranteed rank.
    ///
    /// Contradictory evidence that would empty the set is a bookkeeping
    /// defect: it asserts in debug builds and is ignored otherwise.
    fn restrict(&mut self, allowed: RankSet) -> Option<Rank> {
        let mut next = self.possible;
        next.intersect(allowed);
        if next.is_empty() {
            tracing::error!(possible = ?self.possible, ?allowed, "contradictory rank evidence");
            debug_assert!(false, "rank evidence emptied the belief {:?}", self.possible);
            return None;
        }

        self.possible = next;
        match (self.guaranteed, next.single_rank()) {
            (None, Some(rank)) => {
                self.guaranteed = Some(rank);
                Some(rank)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_against_spy_means_private() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.won_battle(Rank::Spy), Some(Rank::Private));
        assert_eq!(belief.possible(), RankSet::single(Rank::Private));
        assert_eq!(belief.guaranteed(), Some(Rank::Private));
    }

    #[test]
    fn test_lost_against_private_means_spy_or_flag() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.lost_battle(Rank::Private), None);
        assert_eq!(belief.possible(), RankSet::from_ranks([Rank::Spy, Rank::Flag]));

        let mut flag = RankBelief::new();
        flag.remove(Rank::Spy);
        assert_eq!(flag.lost_battle(Rank::Private), Some(Rank::Flag));
    }

    #[test]
    fn test_beating_our_flag_reveals_nothing() {
        let mut belief = RankBelief::new();
        belief.tied_battle(Rank::Major);
        assert_eq!(belief.won_battle(Rank::Flag), None);
        assert_eq!(belief.guaranteed(), Some(Rank::Major));
    }

    #[test]
    fn test_won_against_major() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.won_battle(Rank::Major), None);

        let expected: RankSet = [
            Rank::Spy,
            Rank::General5,
            Rank::General4,
            Rank::General3,
            Rank::General2,
            Rank::General1,
            Rank::Colonel,
            Rank::LtColonel,
        ]
        .into_iter()
        .collect();
        assert_eq!(belief.possible(), expected);
    }

    #[test]
    fn test_won_against_private_excludes_spy() {
        let mut belief = RankBelief::new();
        belief.won_battle(Rank::Private);
        assert!(!belief.possible().contains(Rank::Spy));
        assert!(!belief.possible().contains(Rank::Private));
        assert!(!belief.possible().contains(Rank::Flag));
        assert_eq!(belief.possible().len(), 12);
    }

    #[test]
    fn test_lost_against_captain() {
        let mut belief = RankBelief::new();
        belief.lost_battle(Rank::Captain);
        let expected: RankSet = [
            Rank::Lieutenant1,
            Rank::Lieutenant2,
            Rank::Sergeant,
            Rank::Private,
            Rank::Flag,
        ]
        .into_iter()
        .collect();
        assert_eq!(belief.possible(), expected);
    }

    #[test]
    fn test_lost_against_spy() {
        let mut belief = RankBelief::new();
        belief.lost_battle(Rank::Spy);
        assert_eq!(belief.possible().len(), 13);
        assert!(!belief.possible().contains(Rank::Spy));
        assert!(!belief.possible().contains(Rank::Private));
    }

    #[test]
    fn test_lost_against_flag_means_flag() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.lost_battle(Rank::Flag), Some(Rank::Flag));
    }

    #[test]
    fn test_tie_collapses() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.tied_battle(Rank::Colonel), Some(Rank::Colonel));
        // Already determined: no second collapse report.
        assert_eq!(belief.tied_battle(Rank::Colonel), None);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut belief = RankBelief::new();
        belief.remove(Rank::Major);
        let before = belief;
        assert_eq!(belief.remove(Rank::Major), None);
        assert_eq!(belief, before);
    }

    #[test]
    fn test_remove_until_collapse() {
        let mut belief = RankBelief::new();
        belief.lost_battle(Rank::Sergeant);
        assert_eq!(belief.remove(Rank::Flag), Some(Rank::Private));
        assert!(belief.is_determined());
    }

    #[test]
    fn test_win_chance_uniform() {
        let belief = RankBelief::new();
        // General5 loses only to the Spy and ties itself.
        let expected = 13.0 / 15.0;
        assert!((belief.win_chance(Rank::General5) - expected).abs() < 1e-6);

        let mut sure = RankBelief::new();
        sure.won_battle(Rank::Spy);
        assert_eq!(sure.win_chance(Rank::Sergeant), 0.0);
        assert_eq!(sure.win_chance(Rank::Spy), 0.0);
        assert_eq!(sure.win_chance(Rank::Lieutenant2), 1.0);
    }

    #[test]
    fn test_attack_success_chance() {
        let mut belief = RankBelief::new();
        belief.tied_battle(Rank::Spy);
        // A known Spy attacking our Colonel always wins.
        assert_eq!(belief.attack_success_chance(Rank::Colonel), 1.0);
        assert_eq!(belief.attack_success_chance(Rank::Private), 0.0);
    }

    #[test]
    fn test_confidence() {
        let mut belief = RankBelief::new();
        assert_eq!(belief.confidence(), 0.0);
        belief.tied_battle(Rank::Major);
        assert!((belief.confidence() - 14.0 / 15.0).abs() < 1e-6);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "emptied the belief")]
    fn test_contradiction_panics_in_debug() {
        let mut belief = RankBelief::new();
        belief.won_battle(Rank::Spy);
        belief.lost_battle(Rank::Spy);
    }
}

//! Piece ranks and army composition.
//!
//! Ranks are declared strongest first, so a lower ordinal beats a higher one
//! in ordinary combat. The Spy sits at ordinal 0 but loses to the Private;
//! see [`crate::rules::resolve`] for the full table.
//!
//! ## RankSet
//!
//! A 15-bit set of ranks used by belief tracking. It is `Copy` and iterates
//! in ordinal order.

use serde::{Deserialize, Serialize};

/// Number of distinct ranks.
pub const RANK_COUNT: usize = 15;

/// Pieces per army.
pub const ARMY_SIZE: usize = 21;

/// Combat rank of a piece. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Spy,
    General5,
    General4,
    General3,
    General2,
    General1,
    Colonel,
    LtColonel,
    Major,
    Captain,
    Lieutenant1,
    Lieutenant2,
    Sergeant,
    Private,
    Flag,
}

/// Strategic value per rank, indexed by ordinal.
const RANK_VALUES: [f32; RANK_COUNT] = [
    7.50, 7.80, 6.95, 6.15, 5.40, 4.70, 4.05, 3.45, 2.90, 2.40, 1.95, 1.55, 1.20, 1.37, 0.0,
];

impl Rank {
    /// All ranks in ordinal order.
    pub const ALL: [Rank; RANK_COUNT] = [
        Rank::Spy,
        Rank::General5,
        Rank::General4,
        Rank::General3,
        Rank::General2,
        Rank::General1,
        Rank::Colonel,
        Rank::LtColonel,
        Rank::Major,
        Rank::Captain,
        Rank::Lieutenant1,
        Rank::Lieutenant2,
        Rank::Sergeant,
        Rank::Private,
        Rank::Flag,
    ];

    /// The three strongest generals, candidates for guarding the Flag.
    pub const TOP_GENERALS: [Rank; 3] = [Rank::General5, Rank::General4, Rank::General3];

    /// Ordinal position; lower is stronger in ordinary combat.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Rank at an ordinal, if in range.
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// How many pieces of this rank each army holds.
    #[must_use]
    pub const fn count_per_army(self) -> u8 {
        match self {
            Rank::Spy => 2,
            Rank::Private => 6,
            _ => 1,
        }
    }

    /// Strategic value, used to balance force across flanks.
    #[must_use]
    pub fn value(self) -> f32 {
        RANK_VALUES[self.ordinal()]
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// The 21 ranks of one army, strongest first, duplicates adjacent.
#[must_use]
pub fn army() -> Vec<Rank> {
    Rank::ALL
        .iter()
        .flat_map(|&r| std::iter::repeat(r).take(r.count_per_army() as usize))
        .collect()
}

/// Compact set of ranks.
///
/// ```
/// use generals::core::{Rank, RankSet};
///
/// let mut set = RankSet::all();
/// set.remove(Rank::Flag);
/// assert_eq!(set.len(), 14);
/// assert!(!set.contains(Rank::Flag));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RankSet(u16);

impl RankSet {
    const FULL: u16 = (1 << RANK_COUNT) - 1;

    /// Empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every rank.
    #[must_use]
    pub const fn all() -> Self {
        Self(Self::FULL)
    }

    /// Set holding exactly one rank.
    #[must_use]
    pub const fn single(rank: Rank) -> Self {
        Self(1 << rank as u16)
    }

    /// Build from an iterator of ranks.
    pub fn from_ranks(ranks: impl IntoIterator<Item = Rank>) -> Self {
        ranks.into_iter().fold(Self::empty(), |mut set, r| {
            set.insert(r);
            set
        })
    }

    #[must_use]
    pub const fn contains(self, rank: Rank) -> bool {
        self.0 & (1 << rank as u16) != 0
    }

    pub fn insert(&mut self, rank: Rank) {
        self.0 |= 1 << rank as u16;
    }

    /// Remove a rank. Returns whether it was present.
    pub fn remove(&mut self, rank: Rank) -> bool {
        let present = self.contains(rank);
        self.0 &= !(1 << rank as u16);
        present
    }

    /// Keep only ranks also in `other`.
    pub fn intersect(&mut self, other: RankSet) {
        self.0 &= other.0;
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The only rank in the set, if it holds exactly one.
    #[must_use]
    pub fn single_rank(self) -> Option<Rank> {
        if self.len() == 1 {
            Rank::from_ordinal(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Iterate in ordinal order.
    pub fn iter(self) -> impl Iterator<Item = Rank> {
        Rank::ALL.into_iter().filter(move |&r| self.contains(r))
    }
}

impl FromIterator<Rank> for RankSet {
    fn from_iter<I: IntoIterator<Item = Rank>>(iter: I) -> Self {
        Self::from_ranks(iter)
    }
}

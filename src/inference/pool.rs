//! Counts of opposing pieces per rank that are not yet identified.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{Rank, RANK_COUNT};

/// Remaining unidentified pieces per rank, starting from one army.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPool {
    counts: [u8; RANK_COUNT],
}

impl Default for RankPool {
    fn default() -> Self {
        Self::new()
    }
}

impl RankPool {
    #[must_use]
    pub fn new() -> Self {
        let mut counts = [0; RANK_COUNT];
        for rank in Rank::ALL {
            counts[rank.ordinal()] = rank.count_per_army();
        }
        Self { counts }
    }

    #[must_use]
    pub fn remaining(&self, rank: Rank) -> u8 {
        self.counts[rank.ordinal()]
    }

    /// Total unidentified pieces.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Record one more piece identified as `rank`; returns what is left.
    ///
    /// Decrementing an exhausted rank means more pieces were identified
    /// than exist. That is a deduction defect, asserted in debug builds.
    pub fn decrement(&mut self, rank: Rank) -> u8 {
        let count = &mut self.counts[rank.ordinal()];
        if *count == 0 {
            error!(%rank, "rank pool decremented below zero");
            debug_assert!(false, "rank pool has no {rank} left");
            return 0;
        }
        *count -= 1;
        *count
    }

    /// Ranks with pieces still unidentified, with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, u8)> + '_ {
        Rank::ALL.into_iter().map(move |r| (r, self.counts[r.ordinal()]))
    }
}

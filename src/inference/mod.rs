//! Rank inference about the opposing army.
//!
//! Every opposing piece gets a [`RankBelief`]: the ranks it could still be
//! given the battles it fought. A [`BeliefTracker`] owns one side's beliefs
//! and the shared [`RankPool`] that links them.

mod belief;
mod pool;
mod tracker;

pub use belief::RankBelief;
pub use pool::RankPool;
pub use tracker::BeliefTracker;

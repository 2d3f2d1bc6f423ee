//! Static evaluation of a board for one side.

use crate::board::{Board, MoveInfo};
use crate::core::Side;
use crate::inference::BeliefTracker;
use crate::rules::{resolve, BattleOutcome};

use super::config::AIConfig;

/// Chance that the mover of `mv` wins the battle on `mv.to`.
///
/// Exact when both ranks are visible. Otherwise the hidden piece's belief
/// decides, uniform over what it could still be. Plain steps return 1.0.
#[must_use]
pub fn capture_odds(board: &Board, mv: &MoveInfo, beliefs: &BeliefTracker) -> f32 {
    let Some(defender) = board.piece_at(mv.to) else {
        return 1.0;
    };
    let attacker = board.piece(mv.piece).and_then(|p| p.rank);

    match (attacker, defender.rank) {
        (Some(a), Some(d)) => {
            if resolve(a, d) == BattleOutcome::AttackerWins {
                1.0
            } else {
                0.0
            }
        }
        (Some(a), None) => beliefs.belief(defender.id).win_chance(a),
        (None, Some(d)) => beliefs.belief(mv.piece).attack_success_chance(d),
        (None, None) => 0.5,
    }
}

/// Heuristic value of `board` for `side`.
///
/// Mobility, plus a centred term per capture `side` could make, minus a
/// penalty per enemy next to the Flag when `side` is the engine's own.
#[must_use]
pub fn leaf_value(
    board: &Board,
    side: Side,
    engine_side: Side,
    beliefs: &BeliefTracker,
    config: &AIConfig,
) -> f32 {
    let moves = board.legal_moves(side);
    let mut value = moves.len() as f32 * config.openness_multiplier;

    for mv in moves.iter().filter(|mv| board.piece_at(mv.to).is_some()) {
        let odds = capture_odds(board, mv, beliefs);
        value += (2.0 * odds - 1.0) * config.aggression_multiplier;
    }

    if side == engine_side {
        value -= board.flag_threats(side) as f32 * config.flag_at_risk_multiplier;
    }
    value
}

//! Home rows and baselines.

use crate::core::{Position, Side, HEIGHT};

/// Rows a side may spawn on, inclusive.
#[must_use]
pub const fn home_rows(side: Side) -> (i8, i8) {
    match side {
        Side::A => (0, 2),
        Side::B => (HEIGHT - 3, HEIGHT - 1),
    }
}

/// The row a side's own pieces start behind (its back row).
#[must_use]
pub const fn back_row(side: Side) -> i8 {
    match side {
        Side::A => 0,
        Side::B => HEIGHT - 1,
    }
}

/// The row a side's Flag must reach to win: the opponent's back row.
#[must_use]
pub const fn enemy_baseline(side: Side) -> i8 {
    back_row(side.opponent())
}

/// Check if `position` lies inside `side`'s spawn band.
#[must_use]
pub fn in_home_rows(side: Side, position: Position) -> bool {
    let (low, high) = home_rows(side);
    position.in_bounds() && position.y >= low && position.y <= high
}

/// Every cell of `side`'s spawn band, row by row.
pub fn home_cells(side: Side) -> impl Iterator<Item = Position> {
    Position::all().filter(move |&p| in_home_rows(side, p))
}

//! Board geometry: cell coordinates and orthogonal steps.
//!
//! The board is `WIDTH` columns by `HEIGHT` rows. `x` grows to the right,
//! `y` grows from side A's baseline (row 0) toward side B's (row 7).
//! Movement is one orthogonal step; diagonals never count as adjacent.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of columns.
pub const WIDTH: i8 = 9;

/// Number of rows.
pub const HEIGHT: i8 = 8;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (WIDTH as usize) * (HEIGHT as usize);

/// Orthogonal step direction.
///
/// The declaration order is the order in which legal moves are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in move-generation order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// (dx, dy) offset of one step.
    #[must_use]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A cell coordinate.
///
/// Positions may be constructed outside the grid (a step off the edge);
/// use [`Position::in_bounds`] before indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if the position lies on the board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < WIDTH && self.y >= 0 && self.y < HEIGHT
    }

    /// The neighbouring coordinate in `direction`, which may be off the board.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Orthogonal neighbours that lie on the board, in move-generation order.
    ///
    /// ```
    /// use generals::core::Position;
    ///
    /// let corner = Position::new(0, 0);
    /// assert_eq!(corner.neighbours().as_slice(), &[Position::new(0, 1), Position::new(1, 0)]);
    /// ```
    #[must_use]
    pub fn neighbours(self) -> SmallVec<[Position; 4]> {
        Direction::ALL
            .iter()
            .map(|&d| self.step(d))
            .filter(|p| p.in_bounds())
            .collect()
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub const fn distance(self, other: Self) -> u8 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Check if `other` is exactly one orthogonal step away.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// Row-major index into a `CELL_COUNT` grid. Only valid in bounds.
    #[must_use]
    pub(crate) fn cell_index(self) -> usize {
        debug_assert!(self.in_bounds(), "{self} is off the board");
        self.y as usize * WIDTH as usize + self.x as usize
    }

    /// Iterate over every cell, row by row from row 0.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..HEIGHT).flat_map(|y| (0..WIDTH).map(move |x| Position::new(x, y)))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Position::new(0, 0).in_bounds());
        assert!(Position::new(8, 7).in_bounds());
        assert!(!Position::new(9, 0).in_bounds());
        assert!(!Position::new(0, 8).in_bounds());
        assert!(!Position::new(-1, 3).in_bounds());
    }

    #[test]
    fn test_step_order() {
        let origin = Position::new(4, 4);
        let steps: Vec<_> = Direction::ALL.iter().map(|&d| origin.step(d)).collect();
        assert_eq!(
            steps,
            vec![
                Position::new(4, 5),
                Position::new(4, 3),
                Position::new(3, 4),
                Position::new(5, 4),
            ]
        );
    }

    #[test]
    fn test_adjacency_excludes_diagonals() {
        let origin = Position::new(2, 2);
        assert!(origin.is_adjacent(Position::new(2, 3)));
        assert!(origin.is_adjacent(Position::new(1, 2)));
        assert!(!origin.is_adjacent(Position::new(3, 3)));
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(Position::new(2, 4)));
    }

    #[test]
    fn test_neighbours_clipped_at_edges() {
        assert_eq!(Position::new(4, 4).neighbours().len(), 4);
        assert_eq!(Position::new(0, 3).neighbours().len(), 3);
        assert_eq!(Position::new(8, 7).neighbours().len(), 2);
    }

    #[test]
    fn test_cell_index_is_row_major() {
        assert_eq!(Position::new(0, 0).cell_index(), 0);
        assert_eq!(Position::new(8, 0).cell_index(), 8);
        assert_eq!(Position::new(0, 1).cell_index(), 9);
        assert_eq!(Position::new(8, 7).cell_index(), CELL_COUNT - 1);
    }

    #[test]
    fn test_all_covers_board() {
        let cells: Vec<_> = Position::all().collect();
        assert_eq!(cells.len(), CELL_COUNT);
        assert!(cells.iter().enumerate().all(|(i, p)| p.cell_index() == i));
    }
}

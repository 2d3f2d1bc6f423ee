//! Rule-based opening layouts.
//!
//! The Flag goes on one of the two rearmost rows at a random column and is
//! surrounded by up to three guards (a Spy, a Private and one of the top
//! generals). The rest of the army is spread over three flanks of equal
//! width, either balanced by rank value (conservative) or piled onto one
//! flank (blitz).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Board, SpawnInfo};
use crate::core::{Direction, GameRng, Piece, Position, Rank, Side, WIDTH};
use crate::rules::{back_row, home_cells, in_home_rows};

use super::config::SpawnConfig;

const FLANK_COUNT: usize = 3;
const FLANK_WIDTH: i8 = WIDTH / FLANK_COUNT as i8;

/// How the non-guard pieces are spread over the flanks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlankStrategy {
    /// Each piece joins the flank with the least total value so far.
    Conservative,
    /// Most pieces go to one randomly picked flank.
    Blitz,
}

/// Flank index of a column.
#[must_use]
pub fn flank_of(position: Position) -> usize {
    (position.x / FLANK_WIDTH) as usize
}

fn value_of(piece: &Piece) -> f32 {
    piece.rank.map_or(0.0, Rank::value)
}

/// Placements under construction.
struct Layout {
    free: Vec<Position>,
    placements: Vec<SpawnInfo>,
    flank_value: [f32; FLANK_COUNT],
}

impl Layout {
    fn new(side: Side, board: &Board) -> Self {
        Self {
            free: home_cells(side).filter(|&p| board.piece_at(p).is_none()).collect(),
            placements: Vec::new(),
            flank_value: [0.0; FLANK_COUNT],
        }
    }

    fn is_free(&self, position: Position) -> bool {
        self.free.contains(&position)
    }

    fn free_where(&self, filter: impl Fn(Position) -> bool) -> Vec<Position> {
        self.free.iter().copied().filter(|&p| filter(p)).collect()
    }

    fn has_room(&self, flank: usize) -> bool {
        self.free.iter().any(|&p| flank_of(p) == flank)
    }

    fn place(&mut self, piece: &Piece, position: Position) {
        self.free.retain(|&p| p != position);
        self.flank_value[flank_of(position)] += value_of(piece);
        self.placements.push(SpawnInfo::new(piece.id, position));
    }

    /// Place on a random cell among `cells`, or any free cell if empty.
    fn place_among(&mut self, piece: &Piece, cells: Vec<Position>, rng: &mut GameRng) -> bool {
        let cells = if cells.is_empty() { self.free.clone() } else { cells };
        match rng.choose(&cells).copied() {
            Some(cell) => {
                self.place(piece, cell);
                true
            }
            None => false,
        }
    }
}

/// Heuristic layout for every reserve piece of `side`.
///
/// Cells already occupied on `board` are left alone.
pub fn choose_spawn_placements(
    side: Side,
    board: &Board,
    config: &SpawnConfig,
    rng: &mut GameRng,
) -> Vec<SpawnInfo> {
    let mut layout = Layout::new(side, board);
    let mut pending: Vec<Piece> = board.army(side).reserve().copied().collect();

    let flag_cell = place_flag(side, &mut layout, &mut pending, config, rng);
    if let Some(flag_cell) = flag_cell {
        place_guards(side, flag_cell, &mut layout, &mut pending, rng);
    }

    pending.sort_by(|a, b| value_of(b).total_cmp(&value_of(a)));
    let strategy = if rng.gen_bool(config.blitz_probability) {
        FlankStrategy::Blitz
    } else {
        FlankStrategy::Conservative
    };

    match strategy {
        FlankStrategy::Conservative => {
            for piece in &pending {
                let flank = (0..FLANK_COUNT)
                    .filter(|&f| layout.has_room(f))
                    .min_by(|&a, &b| layout.flank_value[a].total_cmp(&layout.flank_value[b]));
                let cells = match flank {
                    Some(flank) => layout.free_where(|p| flank_of(p) == flank),
                    None => Vec::new(),
                };
                if !layout.place_among(piece, cells, rng) {
                    warn!(%side, piece = %piece.id, "no free home cell left");
                }
            }
        }
        FlankStrategy::Blitz => {
            let target = rng.gen_range_usize(0..FLANK_COUNT);
            for piece in &pending {
                let concentrate = rng.gen_bool(config.blitz_concentration);
                let cells = layout.free_where(|p| (flank_of(p) == target) == concentrate);
                if !layout.place_among(piece, cells, rng) {
                    warn!(%side, piece = %piece.id, "no free home cell left");
                }
            }
        }
    }

    debug!(
        %side,
        ?strategy,
        flag = ?flag_cell,
        placed = layout.placements.len(),
        flank_value = ?layout.flank_value,
        "spawn layout chosen"
    );
    layout.placements
}

fn place_flag(
    side: Side,
    layout: &mut Layout,
    pending: &mut Vec<Piece>,
    config: &SpawnConfig,
    rng: &mut GameRng,
) -> Option<Position> {
    let index = pending.iter().position(Piece::is_flag)?;
    let flag = pending.remove(index);

    let row = if rng.gen_bool(config.back_row_probability) {
        back_row(side)
    } else {
        back_row(side) + side.forward()
    };
    let cells = layout.free_where(|p| p.y == row);
    let before = layout.placements.len();
    layout.place_among(&flag, cells, rng);
    layout.placements.get(before).map(|s| s.target)
}

/// Spy, Private and a top general on the cells beside and in front of the
/// Flag, in random order.
fn place_guards(
    side: Side,
    flag: Position,
    layout: &mut Layout,
    pending: &mut Vec<Piece>,
    rng: &mut GameRng,
) {
    let general = rng.choose(&Rank::TOP_GENERALS).copied().unwrap_or(Rank::General5);
    let guards = [Rank::Spy, Rank::Private, general];

    let ahead = Position::new(flag.x, flag.y + side.forward());
    let mut cells: Vec<Position> = [
        flag.step(Direction::Left),
        flag.step(Direction::Right),
        ahead.step(Direction::Left),
        ahead,
        ahead.step(Direction::Right),
    ]
    .into_iter()
    .filter(|&p| in_home_rows(side, p) && layout.is_free(p))
    .collect();
    rng.shuffle(&mut cells);

    for (rank, cell) in guards.into_iter().zip(cells) {
        if let Some(index) = pending.iter().position(|p| p.rank == Some(rank)) {
            let guard = pending.remove(index);
            layout.place(&guard, cell);
        }
    }
}

/// Shuffle `side`'s free home cells and give one to each reserve piece.
pub fn random_spawn_placements(side: Side, board: &Board, rng: &mut GameRng) -> Vec<SpawnInfo> {
    let mut cells: Vec<Position> = home_cells(side).filter(|&p| board.piece_at(p).is_none()).collect();
    rng.shuffle(&mut cells);
    board
        .army(side)
        .reserve()
        .zip(cells)
        .map(|(piece, cell)| SpawnInfo::new(piece.id, cell))
        .collect()
}

//! Piece ownership: one registry per side.

mod registry;

pub use registry::PieceRegistry;

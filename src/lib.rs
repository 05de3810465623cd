//! Precomputed attack geometry for chess move generation.
//!
//! Rook and bishop attacks come from magic bitboard tables addressed in one of three ways
//! (see [`IndexMode`]). Lines, segments, distances and the attacks of the other pieces are
//! derived from them once at startup.

pub mod types;
pub mod bitboard;
pub mod rays;
pub mod magic;
pub mod magic_data;
pub mod tables;
pub mod geometry;
pub mod attacks;

pub use attacks::{
    aligned, attacks_bb, between_bb, distance, init, init_with, line_bb, pawn_attacks,
    pseudo_attacks, tables, AttackTables,
};
pub use bitboard::{pretty, Bitboard};
pub use magic::IndexMode;
pub use types::{Color, ParseError, PieceType, SliderKind, Square};

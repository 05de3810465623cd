//! Bitboard representation and set-wise helpers.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//!
//! Everything in here is a pure function of square geometry. The occupancy-dependent
//! lookups live in [`crate::attacks`].

use crate::types::{
    Color, Square, EAST, NORTH, NORTH_EAST, NORTH_WEST, SOUTH, SOUTH_EAST, SOUTH_WEST, WEST,
};

pub type Bitboard = u64;

pub const EMPTY: Bitboard = 0;
pub const ALL_SQUARES: Bitboard = !0;
pub const DARK_SQUARES: Bitboard = 0xAA55_AA55_AA55_AA55;

pub const FILE_A_BB: Bitboard = 0x0101_0101_0101_0101;
pub const FILE_B_BB: Bitboard = FILE_A_BB << 1;
pub const FILE_C_BB: Bitboard = FILE_A_BB << 2;
pub const FILE_D_BB: Bitboard = FILE_A_BB << 3;
pub const FILE_E_BB: Bitboard = FILE_A_BB << 4;
pub const FILE_F_BB: Bitboard = FILE_A_BB << 5;
pub const FILE_G_BB: Bitboard = FILE_A_BB << 6;
pub const FILE_H_BB: Bitboard = FILE_A_BB << 7;

pub const RANK_1_BB: Bitboard = 0xFF;
pub const RANK_2_BB: Bitboard = RANK_1_BB << 8;
pub const RANK_3_BB: Bitboard = RANK_1_BB << (8 * 2);
pub const RANK_4_BB: Bitboard = RANK_1_BB << (8 * 3);
pub const RANK_5_BB: Bitboard = RANK_1_BB << (8 * 4);
pub const RANK_6_BB: Bitboard = RANK_1_BB << (8 * 5);
pub const RANK_7_BB: Bitboard = RANK_1_BB << (8 * 6);
pub const RANK_8_BB: Bitboard = RANK_1_BB << (8 * 7);

/// Convert a square to a bitboard with that single bit set
#[inline(always)]
pub const fn square_bb(sq: Square) -> Bitboard {
    1u64 << sq.index()
}

#[inline(always)]
pub const fn file_bb(sq: Square) -> Bitboard {
    FILE_A_BB << sq.file()
}

#[inline(always)]
pub const fn rank_bb(sq: Square) -> Bitboard {
    RANK_1_BB << (8 * sq.rank())
}

#[inline(always)]
pub const fn contains(bb: Bitboard, sq: Square) -> bool {
    bb & square_bb(sq) != 0
}

#[inline(always)]
pub const fn popcount(bb: Bitboard) -> u32 {
    bb.count_ones()
}

#[inline(always)]
pub const fn more_than_one(bb: Bitboard) -> bool {
    bb & bb.wrapping_sub(1) != 0
}

/// Least significant square of a non-empty bitboard.
#[inline(always)]
pub fn lsb(bb: Bitboard) -> Square {
    debug_assert!(bb != 0);
    Square::from_index(bb.trailing_zeros() as u8)
}

/// Most significant square of a non-empty bitboard.
#[inline(always)]
pub fn msb(bb: Bitboard) -> Square {
    debug_assert!(bb != 0);
    Square::from_index(63 ^ bb.leading_zeros() as u8)
}

#[inline(always)]
pub const fn least_significant_square_bb(bb: Bitboard) -> Bitboard {
    bb & bb.wrapping_neg()
}

/// Finds and clears the least significant square of a non-empty bitboard.
#[inline(always)]
pub fn pop_lsb(bb: &mut Bitboard) -> Square {
    let sq = lsb(*bb);
    *bb &= *bb - 1;
    sq
}

/// The most advanced square of a non-empty bitboard from `color`'s point of view.
#[inline]
pub fn frontmost_sq(color: Color, bb: Bitboard) -> Square {
    match color {
        Color::White => msb(bb),
        Color::Black => lsb(bb),
    }
}

#[inline(always)]
pub const fn opposite_colors(s1: Square, s2: Square) -> bool {
    (s1.index() + s1.rank() as usize + s2.index() + s2.rank() as usize) & 1 != 0
}

/// Distance from a file or rank coordinate to the nearest board edge.
#[inline(always)]
pub const fn edge_distance(coord: u8) -> u8 {
    if coord < 7 - coord {
        coord
    } else {
        7 - coord
    }
}

/// Moves every square of the bitboard one step, dropping squares that would wrap around a file edge.
#[inline]
pub const fn shift(bb: Bitboard, direction: i8) -> Bitboard {
    match direction {
        NORTH => bb << 8,
        SOUTH => bb >> 8,
        16 => bb << 16,
        -16 => bb >> 16,
        EAST => (bb & !FILE_H_BB) << 1,
        WEST => (bb & !FILE_A_BB) >> 1,
        NORTH_EAST => (bb & !FILE_H_BB) << 9,
        NORTH_WEST => (bb & !FILE_A_BB) << 7,
        SOUTH_EAST => (bb & !FILE_H_BB) >> 7,
        SOUTH_WEST => (bb & !FILE_A_BB) >> 9,
        _ => 0,
    }
}

/// Squares attacked by pawns of `color` standing on the squares of `bb`.
#[inline]
pub const fn pawn_attacks_bb(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => shift(bb, NORTH_WEST) | shift(bb, NORTH_EAST),
        Color::Black => shift(bb, SOUTH_WEST) | shift(bb, SOUTH_EAST),
    }
}

/// Squares attacked twice by pawns of `color` standing on the squares of `bb`.
#[inline]
pub const fn pawn_double_attacks_bb(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => shift(bb, NORTH_WEST) & shift(bb, NORTH_EAST),
        Color::Black => shift(bb, SOUTH_WEST) & shift(bb, SOUTH_EAST),
    }
}

#[inline]
pub const fn adjacent_files_bb(sq: Square) -> Bitboard {
    shift(file_bb(sq), EAST) | shift(file_bb(sq), WEST)
}

/// Every square on the ranks in front of `sq` from `color`'s point of view.
/// For instance the squares on ranks 1 and 2 for black on d3.
#[inline]
pub const fn forward_ranks_bb(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => !RANK_1_BB << (8 * sq.relative_rank(Color::White) as u32),
        Color::Black => !RANK_8_BB >> (8 * sq.relative_rank(Color::Black) as u32),
    }
}

#[inline]
pub const fn forward_file_bb(color: Color, sq: Square) -> Bitboard {
    forward_ranks_bb(color, sq) & file_bb(sq)
}

/// Squares a pawn of `color` could ever attack while advancing along its file from `sq`.
#[inline]
pub const fn pawn_attack_span(color: Color, sq: Square) -> Bitboard {
    forward_ranks_bb(color, sq) & adjacent_files_bb(sq)
}

/// Enemy pawns in this span stop a pawn of `color` on `sq` from being passed.
#[inline]
pub const fn passed_pawn_span(color: Color, sq: Square) -> Bitboard {
    pawn_attack_span(color, sq) | forward_file_bb(color, sq)
}

/// Chebyshev distance computed from coordinates, used to build the distance table.
#[inline]
pub const fn chebyshev(s1: Square, s2: Square) -> u8 {
    let df = s1.file().abs_diff(s2.file());
    let dr = s1.rank().abs_diff(s2.rank());
    if df > dr {
        df
    } else {
        dr
    }
}

/// Target of a single step from `sq`, or an empty bitboard if the step leaves the board.
/// A step that wraps around the a/h files lands more than two squares away and is rejected too.
#[inline]
pub fn safe_destination(sq: Square, step: i8) -> Bitboard {
    match sq.offset(step) {
        Some(to) if chebyshev(sq, to) <= 2 => square_bb(to),
        _ => EMPTY,
    }
}

/// Iterate over set bits in a bitboard, returning squares in ascending order
pub struct BitboardIter(pub Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

/// ASCII representation of a bitboard, rank 8 at the top. Useful for debugging.
pub fn pretty(bb: Bitboard) -> String {
    const SEPARATOR: &str = "+---+---+---+---+---+---+---+---+\n";
    let mut s = String::from(SEPARATOR);

    for rank in (0..8u8).rev() {
        for file in 0..8u8 {
            s.push_str(if contains(bb, Square::new(file, rank)) { "| X " } else { "|   " });
        }
        s.push_str(&format!("| {}\n", rank + 1));
        s.push_str(SEPARATOR);
    }
    s.push_str("  a   b   c   d   e   f   g   h\n");
    s
}

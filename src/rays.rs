//! Brute-force sliding attacks and relevant occupancy masks.
//!
//! `sliding_attacks` is the ground truth every indexed lookup is checked against, and it also
//! produces the content of the attack tables.

use crate::bitboard::{
    file_bb, lsb, rank_bb, safe_destination, square_bb, Bitboard, FILE_A_BB, FILE_H_BB, RANK_1_BB,
    RANK_8_BB,
};
use crate::types::{SliderKind, Square};

/// Attacks of a rook or bishop on `sq`, walking each ray one step at a time.
/// A blocker is itself attacked but nothing beyond it is.
pub fn sliding_attacks(kind: SliderKind, sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = 0;

    for step in kind.directions() {
        let mut s = sq;
        loop {
            let next = safe_destination(s, step);
            if next == 0 {
                break;
            }
            attacks |= next;
            if occupied & next != 0 {
                break;
            }
            s = lsb(next);
        }
    }

    attacks
}

/// First and last rank and file, minus the rank and file `sq` itself stands on.
#[inline]
pub fn board_edges(sq: Square) -> Bitboard {
    ((RANK_1_BB | RANK_8_BB) & !rank_bb(sq)) | ((FILE_A_BB | FILE_H_BB) & !file_bb(sq))
}

/// Squares whose occupancy can change the attacks of `kind` from `sq`.
/// Edge squares never matter since a ray stops at the border regardless of what stands there.
#[inline]
pub fn relevant_mask(kind: SliderKind, sq: Square) -> Bitboard {
    sliding_attacks(kind, sq, 0) & !board_edges(sq)
}

/// Every subset of a mask, starting with the empty set, using the Carry-Rippler trick.
#[derive(Debug, Clone)]
pub struct Subsets {
    mask: Bitboard,
    next: Bitboard,
    done: bool,
}

impl Subsets {
    pub fn new(mask: Bitboard) -> Self {
        Subsets { mask, next: 0, done: false }
    }
}

impl Iterator for Subsets {
    type Item = Bitboard;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.next;
        self.next = self.next.wrapping_sub(self.mask) & self.mask;
        if self.next == 0 {
            self.done = true;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::popcount;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares.iter().fold(0, |acc, s| acc | square_bb(sq(s)))
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        // Rook on a1 sees the whole a-file and 1st rank
        let attacks = sliding_attacks(SliderKind::Rook, Square::A1, 0);
        assert_eq!(attacks, (FILE_A_BB | RANK_1_BB) & !square_bb(Square::A1));
        assert_eq!(popcount(attacks), 14);

        // Rook on e4 with no blockers: 7 on rank, 7 on file
        assert_eq!(popcount(sliding_attacks(SliderKind::Rook, sq("e4"), 0)), 14);
    }

    #[test]
    fn test_bishop_attacks_empty_board() {
        let attacks = sliding_attacks(SliderKind::Bishop, Square::A1, 0);
        assert_eq!(attacks, bb(&["b2", "c3", "d4", "e5", "f6", "g7", "h8"]));
        assert_eq!(popcount(sliding_attacks(SliderKind::Bishop, sq("e4"), 0)), 13);
    }

    #[test]
    fn test_rook_attacks_with_blockers() {
        // Rook on e4, with pieces on e2 and g4
        let attacks = sliding_attacks(SliderKind::Rook, sq("e4"), bb(&["e2", "g4"]));
        assert_eq!(
            attacks,
            bb(&["e2", "e3", "e5", "e6", "e7", "e8", "a4", "b4", "c4", "d4", "f4", "g4"])
        );
    }

    #[test]
    fn test_bishop_attacks_with_blockers() {
        // Bishop on e4, with pieces on c2 and g6
        let attacks = sliding_attacks(SliderKind::Bishop, sq("e4"), bb(&["c2", "g6"]));
        assert!(attacks & square_bb(sq("c2")) != 0);
        assert!(attacks & square_bb(sq("g6")) != 0);
        assert!(attacks & square_bb(sq("b1")) == 0);
        assert!(attacks & square_bb(sq("h7")) == 0);
        assert_eq!(popcount(attacks), 11);
    }

    #[test]
    fn test_own_square_occupancy_is_ignored() {
        let occupied = square_bb(sq("d4"));
        assert_eq!(
            sliding_attacks(SliderKind::Rook, sq("d4"), occupied),
            sliding_attacks(SliderKind::Rook, sq("d4"), 0)
        );
    }

    #[test]
    fn test_relevant_masks() {
        // a1 rook: a2..a7 and b1..g1
        assert_eq!(relevant_mask(SliderKind::Rook, Square::A1), 0x0001_0101_0101_017e);
        assert_eq!(relevant_mask(SliderKind::Rook, sq("d4")), 0x0008_0808_7608_0800);
        assert_eq!(relevant_mask(SliderKind::Bishop, Square::A1), 0x0040_2010_0804_0200);
        assert_eq!(relevant_mask(SliderKind::Bishop, sq("e4")), 0x0002_4428_0028_4400);

        for s in Square::all() {
            assert!(popcount(relevant_mask(SliderKind::Rook, s)) <= 12);
            assert!(popcount(relevant_mask(SliderKind::Bishop, s)) <= 9);
            assert_eq!(relevant_mask(SliderKind::Rook, s) & square_bb(s), 0);
        }
    }

    #[test]
    fn test_subsets_enumerates_every_subset_once() {
        let mask = relevant_mask(SliderKind::Rook, sq("d4"));
        let mut all: Vec<Bitboard> = Subsets::new(mask).collect();
        assert_eq!(all.len(), 1 << popcount(mask));
        assert_eq!(all[0], 0);
        assert!(all.iter().all(|s| s & !mask == 0));
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1 << popcount(mask));
    }

    #[test]
    fn test_subsets_of_empty_mask() {
        assert_eq!(Subsets::new(0).collect::<Vec<_>>(), vec![0]);
    }
}

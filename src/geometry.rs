//! Tables derived from the slider attacks: lines, segments, distances and the attacks of
//! non-sliding pieces.

use itertools::iproduct;

use crate::bitboard::{chebyshev, pawn_attacks_bb, safe_destination, square_bb, Bitboard};
use crate::tables::SliderAttacks;
use crate::types::{Color, PieceType, SliderKind, Square, KING_STEPS, KNIGHT_STEPS};

type SquarePairTable<T> = Box<[[T; Square::COUNT]]>;

fn square_pair_table<T: Copy + Default>() -> SquarePairTable<T> {
    vec![[T::default(); Square::COUNT]; Square::COUNT].into_boxed_slice()
}

pub struct Geometry {
    distance: SquarePairTable<u8>,
    line: SquarePairTable<Bitboard>,
    between: SquarePairTable<Bitboard>,
    /// Empty board attacks indexed by [`PieceType::index`]. The pawn row stays empty.
    pseudo_attacks: [[Bitboard; Square::COUNT]; 6],
    pawn_attacks: [[Bitboard; Square::COUNT]; 2],
}

impl Geometry {
    /// Build every derived table. `sliders` must already be complete.
    pub fn new(sliders: &SliderAttacks) -> Self {
        let mut distance = square_pair_table();
        let mut line = square_pair_table();
        let mut between = square_pair_table();
        let mut pseudo_attacks = [[0; Square::COUNT]; 6];
        let mut pawn_attacks = [[0; Square::COUNT]; 2];

        for (s1, s2) in iproduct!(Square::all(), Square::all()) {
            distance[s1.index()][s2.index()] = chebyshev(s1, s2);
        }

        for s1 in Square::all() {
            for color in Color::ALL {
                pawn_attacks[color.index()][s1.index()] = pawn_attacks_bb(color, square_bb(s1));
            }

            pseudo_attacks[PieceType::King.index()][s1.index()] =
                KING_STEPS.iter().fold(0, |acc, &step| acc | safe_destination(s1, step));
            pseudo_attacks[PieceType::Knight.index()][s1.index()] =
                KNIGHT_STEPS.iter().fold(0, |acc, &step| acc | safe_destination(s1, step));

            let bishop = sliders.attacks(SliderKind::Bishop, s1, 0);
            let rook = sliders.attacks(SliderKind::Rook, s1, 0);
            pseudo_attacks[PieceType::Bishop.index()][s1.index()] = bishop;
            pseudo_attacks[PieceType::Rook.index()][s1.index()] = rook;
            pseudo_attacks[PieceType::Queen.index()][s1.index()] = bishop | rook;

            for kind in [SliderKind::Bishop, SliderKind::Rook] {
                let from_s1 = sliders.attacks(kind, s1, 0);
                for s2 in Square::all() {
                    if from_s1 & square_bb(s2) != 0 {
                        line[s1.index()][s2.index()] = (from_s1 & sliders.attacks(kind, s2, 0))
                            | square_bb(s1)
                            | square_bb(s2);
                        between[s1.index()][s2.index()] = sliders.attacks(kind, s1, square_bb(s2))
                            & sliders.attacks(kind, s2, square_bb(s1));
                    }
                }
            }

            // Unaligned pairs get just the target square, so "block or capture the checker"
            // masks work without special casing.
            for s2 in Square::all() {
                between[s1.index()][s2.index()] |= square_bb(s2);
            }
        }

        Geometry { distance, line, between, pseudo_attacks, pawn_attacks }
    }

    /// Number of king steps between two squares.
    #[inline(always)]
    pub fn distance(&self, s1: Square, s2: Square) -> u8 {
        self.distance[s1.index()][s2.index()]
    }

    /// The whole line, edge to edge, through two squares sharing a rank, file or diagonal.
    /// Empty if they do not.
    #[inline(always)]
    pub fn line(&self, s1: Square, s2: Square) -> Bitboard {
        self.line[s1.index()][s2.index()]
    }

    /// Squares after `s1` up to and including `s2`. Just `s2` if the squares are not aligned.
    #[inline(always)]
    pub fn between(&self, s1: Square, s2: Square) -> Bitboard {
        self.between[s1.index()][s2.index()]
    }

    #[inline(always)]
    pub fn pseudo_attacks(&self, pt: PieceType, sq: Square) -> Bitboard {
        debug_assert!(pt != PieceType::Pawn, "pawn attacks depend on color");
        self.pseudo_attacks[pt.index()][sq.index()]
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_attacks[color.index()][sq.index()]
    }
}

//! Public attack lookups.
//!
//! [`AttackTables::new`] builds every table once and returns an immutable bundle that can be
//! shared freely between search threads. For engines that prefer free functions, [`init`]
//! stores a process-wide bundle which the functions at the bottom of this module read.

use once_cell::sync::OnceCell;

use crate::bitboard::{square_bb, Bitboard};
use crate::geometry::Geometry;
use crate::magic::IndexMode;
use crate::tables::SliderAttacks;
use crate::types::{Color, PieceType, SliderKind, Square};

/// Every precomputed attack and geometry table.
pub struct AttackTables {
    sliders: SliderAttacks,
    geometry: Geometry,
}

impl AttackTables {
    /// Build all tables with the given index strategy. The split32 strategy runs the magic
    /// search here, so this can take a noticeable fraction of a second.
    pub fn new(mode: IndexMode) -> Self {
        let sliders = SliderAttacks::new(mode);
        let geometry = Geometry::new(&sliders);
        AttackTables { sliders, geometry }
    }

    pub fn mode(&self) -> IndexMode {
        self.sliders.mode()
    }

    pub fn sliders(&self) -> &SliderAttacks {
        &self.sliders
    }

    /// Attacks of a rook or bishop on `sq` given the occupied squares.
    #[inline(always)]
    pub fn slider_attacks(&self, kind: SliderKind, sq: Square, occupied: Bitboard) -> Bitboard {
        self.sliders.attacks(kind, sq, occupied)
    }

    /// Attacks of any non-pawn piece on `sq`. Sliding attacks do not continue past an
    /// occupied square; knights and kings ignore `occupied`.
    #[inline]
    pub fn attacks(&self, pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
        debug_assert!(pt != PieceType::Pawn, "use pawn_attacks for pawns");
        match pt {
            PieceType::Bishop => self.sliders.attacks(SliderKind::Bishop, sq, occupied),
            PieceType::Rook => self.sliders.attacks(SliderKind::Rook, sq, occupied),
            PieceType::Queen => {
                self.sliders.attacks(SliderKind::Bishop, sq, occupied)
                    | self.sliders.attacks(SliderKind::Rook, sq, occupied)
            }
            _ => self.geometry.pseudo_attacks(pt, sq),
        }
    }

    /// Attacks of a non-pawn piece on an empty board.
    #[inline(always)]
    pub fn pseudo_attacks(&self, pt: PieceType, sq: Square) -> Bitboard {
        self.geometry.pseudo_attacks(pt, sq)
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.geometry.pawn_attacks(color, sq)
    }

    /// The full line through `s1` and `s2`, or 0 if they are not on a common line.
    /// For instance c4 and f7 give the whole a2-g8 diagonal.
    #[inline(always)]
    pub fn line_bb(&self, s1: Square, s2: Square) -> Bitboard {
        self.geometry.line(s1, s2)
    }

    /// The semi-open segment from `s1` (excluded) to `s2` (included). If the squares are not
    /// aligned this is just `s2`: c4, f7 gives d5, e6, f7 while e6, f8 gives f8. Evasion
    /// generation relies on this, a defender must either interpose or capture the checker.
    #[inline(always)]
    pub fn between_bb(&self, s1: Square, s2: Square) -> Bitboard {
        self.geometry.between(s1, s2)
    }

    /// Chebyshev distance, the number of king steps from `s1` to `s2`.
    #[inline(always)]
    pub fn distance(&self, s1: Square, s2: Square) -> u8 {
        self.geometry.distance(s1, s2)
    }

    #[inline(always)]
    pub fn file_distance(&self, s1: Square, s2: Square) -> u8 {
        s1.file().abs_diff(s2.file())
    }

    #[inline(always)]
    pub fn rank_distance(&self, s1: Square, s2: Square) -> u8 {
        s1.rank().abs_diff(s2.rank())
    }

    /// Whether the three squares lie on one rank, file or diagonal.
    #[inline(always)]
    pub fn aligned(&self, s1: Square, s2: Square, s3: Square) -> bool {
        self.line_bb(s1, s2) & square_bb(s3) != 0
    }
}

static TABLES: OnceCell<AttackTables> = OnceCell::new();

/// Build the process-wide tables with the mode from the environment or the detected one.
/// Must run before any of the free lookup functions; later calls return the same tables.
pub fn init() -> &'static AttackTables {
    TABLES.get_or_init(|| AttackTables::new(IndexMode::from_env_or_detect()))
}

/// Like [`init`] with an explicit mode. If the tables already exist they are kept as they are.
pub fn init_with(mode: IndexMode) -> &'static AttackTables {
    let tables = TABLES.get_or_init(|| AttackTables::new(mode));
    if tables.mode() != mode {
        log::warn!("attack tables already built with {}, ignoring {}", tables.mode(), mode);
    }
    tables
}

/// The process-wide tables. Calling this before [`init`] is a programming error.
#[inline(always)]
pub fn tables() -> &'static AttackTables {
    match TABLES.get() {
        Some(tables) => tables,
        None => panic!("attack tables used before attacks::init()"),
    }
}

#[inline(always)]
pub fn attacks_bb(pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
    tables().attacks(pt, sq, occupied)
}

#[inline(always)]
pub fn pseudo_attacks(pt: PieceType, sq: Square) -> Bitboard {
    tables().pseudo_attacks(pt, sq)
}

#[inline(always)]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables().pawn_attacks(color, sq)
}

#[inline(always)]
pub fn line_bb(s1: Square, s2: Square) -> Bitboard {
    tables().line_bb(s1, s2)
}

#[inline(always)]
pub fn between_bb(s1: Square, s2: Square) -> Bitboard {
    tables().between_bb(s1, s2)
}

#[inline(always)]
pub fn distance(s1: Square, s2: Square) -> u8 {
    tables().distance(s1, s2)
}

#[inline(always)]
pub fn aligned(s1: Square, s2: Square, s3: Square) -> bool {
    tables().aligned(s1, s2, s3)
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
    fn test_attacks_by_piece_type() {
        let t = AttackTables::new(IndexMode::FixedShift);
        let occupied = bb(&["e2", "g4", "c6"]);
        // Queen on e4 is a rook plus a bishop
        assert_eq!(
            t.attacks(PieceType::Queen, sq("e4"), occupied),
            t.attacks(PieceType::Rook, sq("e4"), occupied)
                | t.attacks(PieceType::Bishop, sq("e4"), occupied)
        );
        assert_eq!(popcount(t.attacks(PieceType::Queen, sq("e4"), 0)), 27);
        // Knights and kings jump regardless of blockers
        assert_eq!(
            t.attacks(PieceType::Knight, sq("e4"), u64::MAX),
            t.pseudo_attacks(PieceType::Knight, sq("e4"))
        );
        assert_eq!(t.attacks(PieceType::King, Square::A1, u64::MAX), bb(&["a2", "b1", "b2"]));
    }

    #[test]
    fn test_aligned() {
        let t = AttackTables::new(IndexMode::Pext);
        assert!(t.aligned(sq("a1"), sq("c3"), sq("h8")));
        assert!(t.aligned(sq("b4"), sq("f4"), sq("h4")));
        assert!(!t.aligned(sq("a1"), sq("c3"), sq("c4")));
        // Not on a common line, so nothing is aligned with them
        assert!(!t.aligned(sq("e6"), sq("f8"), Square::H8));
        assert!(!t.aligned(sq("e6"), sq("f8"), sq("f8")));
    }

    #[test]
    fn test_file_and_rank_distance() {
        let t = AttackTables::new(IndexMode::Pext);
        assert_eq!(t.file_distance(sq("a1"), sq("h3")), 7);
        assert_eq!(t.rank_distance(sq("a1"), sq("h3")), 2);
        assert_eq!(t.distance(sq("a1"), sq("h3")), 7);
    }

    #[test]
    fn test_global_tables() {
        let tables = init();
        assert!(std::ptr::eq(tables, super::tables()));
        assert!(std::ptr::eq(tables, init()));
        assert_eq!(between_bb(sq("c4"), sq("f7")), bb(&["d5", "e6", "f7"]));
        assert_eq!(line_bb(sq("e6"), sq("f8")), 0);
        assert_eq!(distance(sq("a1"), sq("b3")), 2);
        assert_eq!(pawn_attacks(Color::Black, sq("b7")), bb(&["a6", "c6"]));
        assert_eq!(pseudo_attacks(PieceType::King, Square::A1), bb(&["a2", "b1", "b2"]));
        assert_eq!(popcount(attacks_bb(PieceType::Rook, Square::A1, 0)), 14);
        assert!(aligned(sq("a1"), sq("b2"), sq("g7")));
    }

    #[test]
    fn test_tables_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AttackTables>();
    }
}

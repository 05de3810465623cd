//! Storage for sliding piece attacks.
//!
//! All squares of both slider kinds share one flat table. Each (kind, square) pair owns a
//! [`Region`] of it, addressed through the square's [`OccupancyIndex`].

use crate::bitboard::{popcount, Bitboard};
use crate::magic::{
    FixedShiftMagic, IndexMode, MagicRng, MagicSearcher, OccupancyIndex, PextIndex, SplitMagic,
    MAGIC_SEEDS,
};
use crate::magic_data::{
    KnownMagic, BISHOP_MAGICS, FIXED_SHIFT_TABLE_SIZE, PACKED_BISHOP_OFFSET, PACKED_TABLE_SIZE,
    ROOK_MAGICS,
};
use crate::rays::{relevant_mask, sliding_attacks, Subsets};
use crate::types::{SliderKind, Square};

/// Slice of the shared table owned by one square.
///
/// `len` is the number of slots the square's index can reach. In the fixed-shift layout
/// regions of different squares may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: usize,
    pub len: usize,
}

impl Region {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Everything needed to look up the attacks of one slider kind from one square.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry<I> {
    pub mask: Bitboard,
    pub indexer: I,
    pub region: Region,
}

/// Every relevant occupancy of a square together with the attacks it produces.
struct Occupancies {
    occupancies: Vec<Bitboard>,
    references: Vec<Bitboard>,
}

impl Occupancies {
    fn enumerate(kind: SliderKind, sq: Square, mask: Bitboard) -> Self {
        let occupancies: Vec<Bitboard> = Subsets::new(mask).collect();
        let references = occupancies
            .iter()
            .map(|&occupied| sliding_attacks(kind, sq, occupied))
            .collect();
        Occupancies { occupancies, references }
    }

    fn iter(&self) -> impl Iterator<Item = (Bitboard, Bitboard)> + '_ {
        self.occupancies.iter().copied().zip(self.references.iter().copied())
    }
}

/// Rook and bishop attack tables built with index strategy `I`.
pub struct SlidingAttacks<I> {
    table: Box<[Bitboard]>,
    entries: [Vec<IndexEntry<I>>; 2],
}

impl<I: OccupancyIndex> SlidingAttacks<I> {
    #[inline(always)]
    pub fn attacks(&self, kind: SliderKind, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.entries[kind.index()][sq.index()];
        self.table[entry.region.offset + entry.indexer.index(occupied)]
    }

    pub fn entry(&self, kind: SliderKind, sq: Square) -> &IndexEntry<I> {
        &self.entries[kind.index()][sq.index()]
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Lay out both kinds back to back: rooks from 0, bishops from `PACKED_BISHOP_OFFSET`.
    /// `place` receives the square, its mask, its occupancies and its exact-size region and
    /// must fill the region and return the indexer that addresses it.
    fn packed(
        mut place: impl FnMut(SliderKind, Square, Bitboard, &Occupancies, &mut [Bitboard]) -> I,
    ) -> Self {
        let mut table = vec![0; PACKED_TABLE_SIZE].into_boxed_slice();

        let entries = SliderKind::ALL.map(|kind| {
            let mut offset = match kind {
                SliderKind::Rook => 0,
                SliderKind::Bishop => PACKED_BISHOP_OFFSET,
            };
            Square::all()
                .map(|sq| {
                    let mask = relevant_mask(kind, sq);
                    let region = Region { offset, len: 1 << popcount(mask) };
                    let occupancies = Occupancies::enumerate(kind, sq, mask);
                    let indexer = place(
                        kind,
                        sq,
                        mask,
                        &occupancies,
                        &mut table[region.offset..region.end()],
                    );
                    offset = region.end();
                    IndexEntry { mask, indexer, region }
                })
                .collect::<Vec<_>>()
        });

        debug_assert_eq!(entries[SliderKind::Rook.index()][63].region.end(), PACKED_BISHOP_OFFSET);
        debug_assert_eq!(entries[SliderKind::Bishop.index()][63].region.end(), PACKED_TABLE_SIZE);

        SlidingAttacks { table, entries }
    }
}

impl SlidingAttacks<PextIndex> {
    pub fn packed_pext() -> Self {
        let attacks = Self::packed(|_, _, mask, occupancies, region| {
            let indexer = PextIndex { mask };
            for (occupied, reference) in occupancies.iter() {
                region[indexer.index(occupied)] = reference;
            }
            indexer
        });
        log::info!("built pext slider attacks: {} entries", attacks.table_len());
        attacks
    }
}

impl SlidingAttacks<SplitMagic> {
    /// Pack the regions like `packed_pext` but search a split magic for every square first.
    pub fn split32() -> Self {
        let mut searchers = [MagicSearcher::new(), MagicSearcher::new()];
        let mut total_attempts = 0;

        let attacks = Self::packed(|kind, sq, mask, occupancies, region| {
            let mut rng = MagicRng::new(MAGIC_SEEDS[sq.rank() as usize]);
            let found = searchers[kind.index()].find(
                mask,
                &occupancies.occupancies,
                &occupancies.references,
                region,
                &mut rng,
            );
            log::debug!(
                "{:?} {}: magic {:#018x} after {} attempts",
                kind,
                sq,
                found.magic.magic,
                found.attempts
            );
            total_attempts += found.attempts;
            found.magic
        });

        log::info!(
            "built split32 slider attacks: {} entries, {} magic candidates tried",
            attacks.table_len(),
            total_attempts
        );
        attacks
    }
}

impl SlidingAttacks<FixedShiftMagic> {
    /// Use the bundled magics and their overlapping offsets.
    pub fn fixed_shift() -> Self {
        let mut table = vec![0; FIXED_SHIFT_TABLE_SIZE].into_boxed_slice();

        let entries = SliderKind::ALL.map(|kind| {
            let known: &[KnownMagic; 64] = match kind {
                SliderKind::Rook => &ROOK_MAGICS,
                SliderKind::Bishop => &BISHOP_MAGICS,
            };
            Square::all()
                .zip(known.iter())
                .map(|(sq, known)| {
                    let mask = relevant_mask(kind, sq);
                    let indexer = FixedShiftMagic {
                        mask,
                        magic: known.magic,
                        shift: 64 - kind.fixed_bits(),
                    };
                    let offset = known.offset as usize;
                    let mut len = 0;
                    for occupied in Subsets::new(mask) {
                        let idx = indexer.index(occupied);
                        let reference = sliding_attacks(kind, sq, occupied);
                        // Overlapping regions may only share slots holding the same attacks.
                        // Slider attacks are never empty, so 0 marks a free slot.
                        debug_assert!(
                            table[offset + idx] == 0 || table[offset + idx] == reference,
                            "{kind:?} {sq}: fixed-shift slot {} already taken",
                            offset + idx
                        );
                        table[offset + idx] = reference;
                        len = len.max(idx + 1);
                    }
                    IndexEntry { mask, indexer, region: Region { offset, len } }
                })
                .collect::<Vec<_>>()
        });

        log::info!("built fixed-shift slider attacks: {} entries", table.len());
        SlidingAttacks { table, entries }
    }
}

/// The slider tables of whichever index strategy was selected at startup.
pub enum SliderAttacks {
    Pext(SlidingAttacks<PextIndex>),
    FixedShift(SlidingAttacks<FixedShiftMagic>),
    Split32(SlidingAttacks<SplitMagic>),
}

impl SliderAttacks {
    pub fn new(mode: IndexMode) -> Self {
        match mode {
            IndexMode::Pext => SliderAttacks::Pext(SlidingAttacks::packed_pext()),
            IndexMode::FixedShift => SliderAttacks::FixedShift(SlidingAttacks::fixed_shift()),
            IndexMode::Split32 => SliderAttacks::Split32(SlidingAttacks::split32()),
        }
    }

    #[inline(always)]
    pub fn attacks(&self, kind: SliderKind, sq: Square, occupied: Bitboard) -> Bitboard {
        match self {
            SliderAttacks::Pext(t) => t.attacks(kind, sq, occupied),
            SliderAttacks::FixedShift(t) => t.attacks(kind, sq, occupied),
            SliderAttacks::Split32(t) => t.attacks(kind, sq, occupied),
        }
    }

    pub fn mode(&self) -> IndexMode {
        match self {
            SliderAttacks::Pext(_) => IndexMode::Pext,
            SliderAttacks::FixedShift(_) => IndexMode::FixedShift,
            SliderAttacks::Split32(_) => IndexMode::Split32,
        }
    }

    pub fn table_len(&self) -> usize {
        match self {
            SliderAttacks::Pext(t) => t.table_len(),
            SliderAttacks::FixedShift(t) => t.table_len(),
            SliderAttacks::Split32(t) => t.table_len(),
        }
    }

    /// Relevant occupancy mask of a square.
    pub fn mask(&self, kind: SliderKind, sq: Square) -> Bitboard {
        match self {
            SliderAttacks::Pext(t) => t.entry(kind, sq).mask,
            SliderAttacks::FixedShift(t) => t.entry(kind, sq).mask,
            SliderAttacks::Split32(t) => t.entry(kind, sq).mask,
        }
    }

    pub fn region(&self, kind: SliderKind, sq: Square) -> Region {
        match self {
            SliderAttacks::Pext(t) => t.entry(kind, sq).region,
            SliderAttacks::FixedShift(t) => t.entry(kind, sq).region,
            SliderAttacks::Split32(t) => t.entry(kind, sq).region,
        }
    }

    /// Index of `occupied` relative to the start of the square's region.
    pub fn index(&self, kind: SliderKind, sq: Square, occupied: Bitboard) -> usize {
        match self {
            SliderAttacks::Pext(t) => t.entry(kind, sq).indexer.index(occupied),
            SliderAttacks::FixedShift(t) => t.entry(kind, sq).indexer.index(occupied),
            SliderAttacks::Split32(t) => t.entry(kind, sq).indexer.index(occupied),
        }
    }
}

//! Occupancy to table index mappings for sliding piece lookups.
//!
//! Three interchangeable strategies are provided, all of them mapping `occupied & mask`
//! injectively (up to equal attack sets) into a small integer:
//!
//! * [`PextIndex`] extracts the masked bits directly (BMI2 `pext` when available).
//! * [`FixedShiftMagic`] uses precomputed 64-bit magics with a fixed shift per slider kind,
//!   which lets different squares share overlapping regions of one table.
//! * [`SplitMagic`] splits the product into two 32-bit halves for targets without fast
//!   64-bit multiplication. Its magics are searched for at startup.
//!
//! See www.chessprogramming.org/Magic_Bitboards for background.

use std::fmt;
use std::str::FromStr;

use rand::{RngCore, SeedableRng};

use crate::bitboard::{popcount, Bitboard};
use crate::types::ParseError;

/// Maps an occupancy bitboard to an index into a square's region of the attack table.
pub trait OccupancyIndex: Copy {
    fn index(&self, occupied: Bitboard) -> usize;
}

/// Parallel bit extraction of the relevant occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PextIndex {
    pub mask: Bitboard,
}

impl OccupancyIndex for PextIndex {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        pext(occupied, self.mask) as usize
    }
}

/// Whether this build uses the hardware `pext` instruction.
pub const HAS_PEXT: bool = cfg!(all(target_arch = "x86_64", target_feature = "bmi2"));

/// Gather the bits of `value` selected by `mask` into the low bits of the result.
#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
#[inline(always)]
pub fn pext(value: u64, mask: u64) -> u64 {
    // SAFETY: this function is only compiled when the target guarantees BMI2.
    unsafe { std::arch::x86_64::_pext_u64(value, mask) }
}

/// Gather the bits of `value` selected by `mask` into the low bits of the result.
#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
#[inline]
pub fn pext(value: u64, mask: u64) -> u64 {
    let mut result = 0;
    let mut bit = 1u64;
    let mut m = mask;
    while m != 0 {
        let lowest = m & m.wrapping_neg();
        if value & lowest != 0 {
            result |= bit;
        }
        bit <<= 1;
        m ^= lowest;
    }
    result
}

/// "Fixed shift fancy" magic: 12 index bits for rooks and 9 for bishops on every square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedShiftMagic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u32,
}

impl OccupancyIndex for FixedShiftMagic {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Fancy magic computed with two 32-bit products instead of one 64-bit product.
/// The shift leaves exactly `popcount(mask)` index bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMagic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift32: u32,
}

impl SplitMagic {
    pub fn new(mask: Bitboard, magic: u64) -> Self {
        SplitMagic { mask, magic, shift32: 32 - popcount(mask) }
    }
}

impl OccupancyIndex for SplitMagic {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        let lo = (occupied as u32) & (self.mask as u32);
        let hi = ((occupied >> 32) as u32) & ((self.mask >> 32) as u32);
        let product = lo.wrapping_mul(self.magic as u32) ^ hi.wrapping_mul((self.magic >> 32) as u32);
        (product >> self.shift32) as usize
    }
}

/// Which index strategy the sliding attack tables are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum IndexMode {
    /// Hardware bit extraction
    Pext,
    /// Precomputed 64-bit magics with overlapping table regions
    FixedShift,
    /// Split 32-bit magics searched at startup
    Split32,
}

/// Environment variable that overrides the detected index mode.
pub const INDEX_MODE_ENV: &str = "CHESS_ATTACKS_MODE";

impl IndexMode {
    pub const ALL: [IndexMode; 3] = [IndexMode::Pext, IndexMode::FixedShift, IndexMode::Split32];

    /// The fastest strategy this build supports.
    pub fn detect() -> IndexMode {
        if HAS_PEXT {
            IndexMode::Pext
        } else if cfg!(target_pointer_width = "64") {
            IndexMode::FixedShift
        } else {
            IndexMode::Split32
        }
    }

    /// `CHESS_ATTACKS_MODE` if it is set and names a mode, otherwise [`IndexMode::detect`].
    pub fn from_env_or_detect() -> IndexMode {
        match std::env::var(INDEX_MODE_ENV) {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                log::warn!("ignoring {INDEX_MODE_ENV}: {err}");
                IndexMode::detect()
            }),
            Err(_) => IndexMode::detect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndexMode::Pext => "pext",
            IndexMode::FixedShift => "fixed-shift",
            IndexMode::Split32 => "split32",
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::InvalidIndexMode(s.to_string()))
    }
}

/// PRNG seeds per rank, picked so the split magic search finishes quickly.
pub const MAGIC_SEEDS: [u64; 8] = [8977, 44560, 54343, 38998, 5731, 95205, 104912, 17020];

/// xorshift64* generator used by the magic search.
///
/// Deterministic for a given seed, so the searched magics are identical on every run.
#[derive(Debug, Clone)]
pub struct MagicRng {
    state: u64,
}

impl MagicRng {
    pub fn new(seed: u64) -> Self {
        // an all-zero state would only ever produce zeros
        MagicRng { state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed } }
    }

    #[inline]
    fn rand64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(2_685_821_657_736_338_717)
    }
}

impl RngCore for MagicRng {
    fn next_u32(&mut self) -> u32 {
        (self.rand64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.rand64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.rand64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MagicRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        MagicRng::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        MagicRng::new(state)
    }
}

/// Outcome of a successful split magic search for one square.
#[derive(Debug, Clone, Copy)]
pub struct MagicSearch {
    pub magic: SplitMagic,
    pub attempts: u64,
}

/// Scratch space shared by the searches of all squares of one slider kind.
///
/// Instead of clearing the table region after every failed candidate, each slot remembers the
/// attempt that last wrote it, so a verification pass only touches the slots it indexes.
pub struct MagicSearcher {
    epoch: Vec<u32>,
    attempt: u32,
}

impl MagicSearcher {
    pub fn new() -> Self {
        MagicSearcher { epoch: vec![0; 4096], attempt: 0 }
    }

    /// Search a split magic mapping every occupancy to a slot holding its reference attacks.
    ///
    /// `occupancies` and `references` are parallel: all subsets of `mask` and their attacks.
    /// On success `region` holds the lookup table for the square. The loop only ends once a
    /// magic verifies, which for relevant masks of at most 12 bits happens after a few
    /// thousand candidates at worst.
    pub fn find(
        &mut self,
        mask: Bitboard,
        occupancies: &[Bitboard],
        references: &[Bitboard],
        region: &mut [Bitboard],
        rng: &mut impl RngCore,
    ) -> MagicSearch {
        debug_assert_eq!(occupancies.len(), references.len());
        debug_assert_eq!(region.len(), occupancies.len());
        if self.epoch.len() < region.len() {
            self.epoch.resize(region.len(), 0);
        }

        let mut attempts = 0;
        loop {
            let magic = loop {
                let candidate = sparse_rand(&mut *rng);
                if popcount(candidate.wrapping_mul(mask) >> 56) >= 6 {
                    break candidate;
                }
            };
            attempts += 1;
            self.attempt += 1;

            let indexer = SplitMagic::new(mask, magic);
            if self.verify(&indexer, occupancies, references, region) {
                return MagicSearch { magic: indexer, attempts };
            }
        }
    }

    fn verify(
        &mut self,
        indexer: &SplitMagic,
        occupancies: &[Bitboard],
        references: &[Bitboard],
        region: &mut [Bitboard],
    ) -> bool {
        for (&occupied, &reference) in occupancies.iter().zip(references) {
            let idx = indexer.index(occupied);
            if self.epoch[idx] < self.attempt {
                self.epoch[idx] = self.attempt;
                region[idx] = reference;
            } else if region[idx] != reference {
                return false;
            }
        }
        true
    }
}

impl Default for MagicSearcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A number with on average only 1/8th of its bits set. Magics tend to be sparse.
#[inline]
pub fn sparse_rand(rng: &mut impl RngCore) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rays::{relevant_mask, sliding_attacks, Subsets};
    use crate::types::{SliderKind, Square};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pext() {
        assert_eq!(pext(0, 0xFF00), 0);
        assert_eq!(pext(0xFF00, 0xFF00), 0xFF);
        assert_eq!(pext(0b1010_0000, 0b1110_0000), 0b101);
        assert_eq!(pext(u64::MAX, 0x8000_0000_0000_0001), 0b11);
        assert_eq!(pext(0x8000_0000_0000_0000, 0x8000_0000_0000_0001), 0b10);
    }

    #[test]
    fn test_pext_index_is_dense() {
        let mask = relevant_mask(SliderKind::Bishop, Square::A1);
        let indexer = PextIndex { mask };
        let mut seen: Vec<usize> = Subsets::new(mask).map(|occ| indexer.index(occ)).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..1 << popcount(mask)).collect::<Vec<usize>>());
    }

    #[test]
    fn test_index_ignores_irrelevant_squares() {
        let mask = relevant_mask(SliderKind::Rook, Square::A1);
        let fixed = FixedShiftMagic { mask, magic: 0x0028_0077_ffeb_fffe, shift: 64 - 12 };
        let split = SplitMagic::new(mask, 0x0028_0077_ffeb_fffe);
        let pext = PextIndex { mask };
        let noise = !mask;
        for occ in Subsets::new(mask).step_by(37) {
            assert_eq!(fixed.index(occ), fixed.index(occ | noise));
            assert_eq!(split.index(occ), split.index(occ | noise));
            assert_eq!(pext.index(occ), pext.index(occ | noise));
        }
    }

    #[test]
    fn test_index_mode_parsing() {
        assert_eq!("pext".parse::<IndexMode>(), Ok(IndexMode::Pext));
        assert_eq!("Fixed-Shift".parse::<IndexMode>(), Ok(IndexMode::FixedShift));
        assert_eq!(" split32 ".parse::<IndexMode>(), Ok(IndexMode::Split32));
        assert_eq!(
            "bmi2".parse::<IndexMode>(),
            Err(ParseError::InvalidIndexMode("bmi2".to_string()))
        );
        for mode in IndexMode::ALL {
            assert_eq!(mode.to_string().parse::<IndexMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_detect_matches_build() {
        let mode = IndexMode::detect();
        if HAS_PEXT {
            assert_eq!(mode, IndexMode::Pext);
        } else if cfg!(target_pointer_width = "64") {
            assert_eq!(mode, IndexMode::FixedShift);
        } else {
            assert_eq!(mode, IndexMode::Split32);
        }
    }

    #[test]
    fn test_magic_rng_is_deterministic() {
        let mut a = MagicRng::seed_from_u64(MAGIC_SEEDS[0]);
        let mut b = MagicRng::new(MAGIC_SEEDS[0]);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let mut zero = MagicRng::new(0);
        assert_ne!(zero.next_u64(), 0);
    }

    #[test]
    fn test_magic_rng_fill_bytes() {
        let mut a = MagicRng::new(42);
        let mut b = MagicRng::new(42);
        let mut buf = [0u8; 12];
        a.fill_bytes(&mut buf);
        let first = b.next_u64().to_le_bytes();
        let second = b.next_u64().to_le_bytes();
        assert_eq!(&buf[..8], &first[..]);
        assert_eq!(&buf[8..], &second[..4]);
    }

    #[test]
    fn test_sparse_numbers_are_sparse() {
        let mut rng = MagicRng::new(MAGIC_SEEDS[3]);
        let total: u32 = (0..1000).map(|_| sparse_rand(&mut rng).count_ones()).sum();
        // expected 8 bits per draw
        assert!(total > 6_000 && total < 10_000, "{total}");
    }

    #[test]
    fn test_search_finds_collision_free_magic() {
        let sq = Square::from_algebraic("d4").unwrap();
        let mask = relevant_mask(SliderKind::Rook, sq);
        let occupancies: Vec<Bitboard> = Subsets::new(mask).collect();
        let references: Vec<Bitboard> = occupancies
            .iter()
            .map(|&occ| sliding_attacks(SliderKind::Rook, sq, occ))
            .collect();
        let mut region = vec![0; occupancies.len()];
        let mut rng = MagicRng::new(MAGIC_SEEDS[sq.rank() as usize]);

        let found = MagicSearcher::new().find(mask, &occupancies, &references, &mut region, &mut rng);
        assert!(found.attempts >= 1);
        assert_eq!(found.magic.shift32, 32 - popcount(mask));
        for (&occ, &reference) in occupancies.iter().zip(&references) {
            assert_eq!(region[found.magic.index(occ)], reference);
        }
    }
}

//! Precomputed fixed-shift magics and their offsets in the shared attack table.
//!
//! With a fixed shift every rook square nominally owns 4096 slots and every bishop square 512,
//! but the offsets below let regions overlap wherever the indices actually produced never
//! collide. Rook and bishop regions interleave inside the same table, which needs only
//! `FIXED_SHIFT_TABLE_SIZE` entries instead of 64 * (4096 + 512).
//! These magics and offsets were originally found by Volker Annuss.

/// A fixed-shift magic multiplier and the start of its square's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownMagic {
    pub magic: u64,
    pub offset: u32,
}

const fn km(magic: u64, offset: u32) -> KnownMagic {
    KnownMagic { magic, offset }
}

/// Entries needed by the fixed-shift layout.
pub const FIXED_SHIFT_TABLE_SIZE: usize = 89_524;

/// Start of the bishop regions in the packed (pext and split32) layout. Rooks come first.
pub const PACKED_BISHOP_OFFSET: usize = 0x19000;

/// Entries needed by the packed layout: every square gets exactly `2^popcount(mask)` slots.
pub const PACKED_TABLE_SIZE: usize = 0x19000 + 0x1480;

#[rustfmt::skip]
pub const ROOK_MAGICS: [KnownMagic; 64] = [
    km(0x0028_0077_ffeb_fffe, 41305), // a1
    km(0x2004_0102_0109_7fff, 14326), // b1
    km(0x0010_0200_1005_3fff, 24477), // c1
    km(0x0030_002f_f71f_fffa,  8223), // d1
    km(0x7fd0_0441_ffff_d003, 49795), // e1
    km(0x0040_01d9_e03f_fff7, 60546), // f1
    km(0x0040_0088_8847_ffff, 28543), // g1
    km(0x0068_00fb_ff75_fffd, 79282), // h1
    km(0x0000_2801_0113_ffff,  6457), // a2
    km(0x0020_0402_01fc_ffff,  4125), // b2
    km(0x007f_e800_42ff_ffe8, 81021), // c2
    km(0x0000_1800_217f_ffe8, 42341), // d2
    km(0x0000_1800_073f_ffe8, 14139), // e2
    km(0x007f_e800_9eff_ffe8, 19465), // f2
    km(0x0000_1800_602f_ffe8,  9514), // g2
    km(0x0000_3000_2fff_ffa0, 71090), // h2
    km(0x0030_0018_010b_ffff, 75419), // a3
    km(0x0003_000c_0085_fffb, 33476), // b3
    km(0x0004_0008_0201_0008, 27117), // c3
    km(0x0002_0020_0400_2002, 85964), // d3
    km(0x0002_0020_2001_0002, 54915), // e3
    km(0x0001_0020_2000_8001, 36544), // f3
    km(0x0000_0040_4000_8001, 71854), // g3
    km(0x0000_8020_0020_0040, 37996), // h3
    km(0x0040_2000_1008_0010, 30398), // a4
    km(0x0000_0800_1004_0010, 55939), // b4
    km(0x0004_0100_0802_0008, 53891), // c4
    km(0x0000_0400_2020_0200, 56963), // d4
    km(0x0000_0100_2002_0020, 77451), // e4
    km(0x0000_0100_2020_0080, 12319), // f4
    km(0x0000_0080_2020_0040, 88500), // g4
    km(0x0000_2000_2000_4081, 51405), // h4
    km(0x00ff_fd18_0030_0030, 72878), // a5
    km(0x007f_ff7f_bfd4_0020,   676), // b5
    km(0x003f_ffbd_0018_0018, 83122), // c5
    km(0x001f_ffde_8018_0018, 22206), // d5
    km(0x000f_ffe0_bfe8_0018, 75186), // e5
    km(0x0001_0000_8020_2001,   681), // f5
    km(0x0003_fffb_ff98_0180, 36453), // g5
    km(0x0001_fffd_ff90_00e0, 20369), // h5
    km(0x00ff_feeb_feff_d800,  1981), // a6
    km(0x007f_fff7_ffc0_1400, 13343), // b6
    km(0x0000_4081_0420_0204, 10650), // c6
    km(0x001f_fff0_1fc0_3000, 57987), // d6
    km(0x000f_ffe7_f8bf_e800, 26302), // e6
    km(0x0000_0080_0100_2020, 58357), // f6
    km(0x0003_fff8_5fff_a804, 40546), // g6
    km(0x0001_fffd_75ff_a802,     0), // h6
    km(0x00ff_ffec_0028_0028, 14967), // a7
    km(0x007f_ff75_ff7f_bfd8, 80361), // b7
    km(0x003f_ff86_3fbf_7fd8, 40905), // c7
    km(0x001f_ffbf_dfd7_ffd8, 58347), // d7
    km(0x000f_fff8_1028_0028, 20381), // e7
    km(0x0007_ffd7_f7fe_ffd8, 81868), // f7
    km(0x0003_fffc_0c48_0048, 59381), // g7
    km(0x0001_ffff_afd7_ffd8, 84404), // h7
    km(0x00ff_ffe4_ffdf_a3ba, 45811), // a8
    km(0x007f_ffef_7ff3_d3da, 62898), // b8
    km(0x003f_ffbf_dfef_f7fa, 45796), // c8
    km(0x001f_ffef_f7fb_fc22, 66994), // d8
    km(0x0000_0204_0800_1001, 67204), // e8
    km(0x0007_fffe_ffff_77fd, 32448), // f8
    km(0x0003_ffff_bf7d_feec, 62946), // g8
    km(0x0001_ffff_9dff_a333, 17005), // h8
];

#[rustfmt::skip]
pub const BISHOP_MAGICS: [KnownMagic; 64] = [
    km(0x0000_4040_4040_4040, 33104), // a1
    km(0x0000_a060_4010_07fc,  4094), // b1
    km(0x0000_4010_2020_0000, 24764), // c1
    km(0x0000_8060_0400_0000, 13882), // d1
    km(0x0000_4402_0000_0000, 23090), // e1
    km(0x0000_0801_0080_0000, 32640), // f1
    km(0x0000_1041_0400_4000, 11558), // g1
    km(0x0000_0200_2082_0080, 32912), // h1
    km(0x0000_0401_0020_2004, 13674), // a2
    km(0x0000_0200_8020_0802,  6109), // b2
    km(0x0000_0100_4008_0200, 26494), // c2
    km(0x0000_0080_6004_0000, 17919), // d2
    km(0x0000_0044_0200_0000, 25757), // e2
    km(0x0000_0021_c100_b200, 17338), // f2
    km(0x0000_0004_0041_0080, 16983), // g2
    km(0x0000_03f7_f05f_ffc0, 16659), // h2
    km(0x0004_2280_4080_8010, 13610), // a3
    km(0x0000_2000_4040_4040,  2224), // b3
    km(0x0000_4000_8080_8080, 60405), // c3
    km(0x0000_2002_0080_1000,  7983), // d3
    km(0x0000_2400_8084_0000,    17), // e3
    km(0x0000_1800_0c03_fff8, 34321), // f3
    km(0x0000_0a58_4020_8020, 33216), // g3
    km(0x0000_0584_0840_4010, 17127), // h3
    km(0x0002_0220_0040_8020,  6397), // a4
    km(0x0000_4020_0040_8080, 22169), // b4
    km(0x0000_8040_0081_0100, 42727), // c4
    km(0x0001_0040_3c04_03ff,   155), // d4
    km(0x0007_8402_a880_2000,  8601), // e4
    km(0x0000_1010_0080_4400, 21101), // f4
    km(0x0000_0808_0010_4100, 29885), // g4
    km(0x0000_4004_8010_1008, 29340), // h4
    km(0x0001_0101_0200_4040, 19785), // a5
    km(0x0000_8080_9040_2020, 12258), // b5
    km(0x0007_fefe_0881_0010, 50451), // c5
    km(0x0003_ff0f_833f_c080,  1712), // d5
    km(0x007f_e080_1900_3042, 78475), // e5
    km(0x0000_2020_4000_8040,  7855), // f5
    km(0x0001_0040_0838_1008, 13642), // g5
    km(0x0000_8020_0370_0808,  8156), // h5
    km(0x0000_2082_0040_0080,  4348), // a6
    km(0x0000_1041_0020_0040, 28794), // b6
    km(0x0003_ffdf_7f83_3fc0, 22578), // c6
    km(0x0000_0088_4045_0020, 50315), // d6
    km(0x0000_0200_4010_0100, 85452), // e6
    km(0x007f_ffdd_8014_0028, 32816), // f6
    km(0x0000_2020_2020_0040, 13930), // g6
    km(0x0001_0040_1003_9004, 17967), // h6
    km(0x0000_0400_4100_8000, 33200), // a7
    km(0x0003_ffef_e0c0_2200, 32456), // b7
    km(0x0000_0010_1080_6000,  7762), // c7
    km(0x0000_0000_0840_3000,  7794), // d7
    km(0x0000_0001_0020_2000, 22761), // e7
    km(0x0000_0401_0020_0800, 14918), // f7
    km(0x0000_4040_4040_4000, 11620), // g7
    km(0x0000_6020_6018_03f4, 15925), // h7
    km(0x0003_ffdf_dfc2_8048, 32528), // a8
    km(0x0000_0008_2082_0020, 12196), // b8
    km(0x0000_0000_1010_8060, 32720), // c8
    km(0x0000_0000_0008_4030, 26781), // d8
    km(0x0000_0000_0100_2020, 19817), // e8
    km(0x0000_0000_4040_8020, 24732), // f8
    km(0x0000_0040_4040_4040, 25468), // g8
    km(0x0000_4040_4040_4040, 10186), // h8
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_fit_the_table() {
        for known in ROOK_MAGICS.iter().chain(BISHOP_MAGICS.iter()) {
            assert!((known.offset as usize) < FIXED_SHIFT_TABLE_SIZE);
            assert_ne!(known.magic, 0);
        }
    }

    #[test]
    fn test_packed_layout_sizes() {
        // 2^popcount summed over all rook masks, then all bishop masks
        assert_eq!(PACKED_BISHOP_OFFSET, 102_400);
        assert_eq!(PACKED_TABLE_SIZE - PACKED_BISHOP_OFFSET, 5_248);
    }
}

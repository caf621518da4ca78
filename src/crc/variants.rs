//! The seven named CRC variants from spec §4.1, each with a typed
//! `compute` wrapper backed by a `const`-built table.

use super::{build_table, compute_bitserial, compute_table, CrcParams};

/// CRC-8 (SAE J1850): used standalone and as the basis of Profile 1's CRC.
pub const CRC8_J1850: CrcParams = CrcParams {
    width: 8,
    poly: 0x1D,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0xFF,
    check: 0x4B,
};

/// CRC-8/2F: SAE J1850 polynomial variant with a different poly constant.
pub const CRC8_2F: CrcParams = CrcParams {
    width: 8,
    poly: 0x2F,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0xFF,
    check: 0xDF,
};

/// CRC-16 (CCITT-FALSE): used standalone and as the basis of Profile 5's CRC.
pub const CRC16_CCITT_FALSE: CrcParams = CrcParams {
    width: 16,
    poly: 0x1021,
    init: 0xFFFF,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0x29B1,
};

/// CRC-16/ARC.
pub const CRC16_ARC: CrcParams = CrcParams {
    width: 16,
    poly: 0x8005,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0xBB3D,
};

/// CRC-32 (Ethernet).
pub const CRC32_ETHERNET: CrcParams = CrcParams {
    width: 32,
    poly: 0x04C1_1DB7,
    init: 0xFFFF_FFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFF_FFFF,
    check: 0xCBF4_3926,
};

/// CRC-32/P4 (0xF4ACFB13).
pub const CRC32_P4: CrcParams = CrcParams {
    width: 32,
    poly: 0xF4AC_FB13,
    init: 0xFFFF_FFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFF_FFFF,
    check: 0x1697_D06A,
};

/// CRC-64/ECMA.
pub const CRC64_ECMA: CrcParams = CrcParams {
    width: 64,
    poly: 0x42F0_E1EB_A9EA_3693,
    init: 0xFFFF_FFFF_FFFF_FFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFF_FFFF_FFFF_FFFF,
    check: 0x995D_C9BB_DF19_39FA,
};

pub const ALL: &[&CrcParams] = &[
    &CRC8_J1850,
    &CRC8_2F,
    &CRC16_CCITT_FALSE,
    &CRC16_ARC,
    &CRC32_ETHERNET,
    &CRC32_P4,
    &CRC64_ECMA,
];

macro_rules! typed_variant {
    ($mod_name:ident, $params:expr, $word:ty, $table_len:expr) => {
        pub mod $mod_name {
            use super::*;

            const TABLE: [u64; 256] = build_table($params.poly, $params.width);

            /// Table-driven compute, typed to this variant's word width.
            pub fn compute(data: &[u8], start_value: $word, is_first_call: bool) -> $word {
                compute_table(&$params, &TABLE, data, start_value as u64, is_first_call) as $word
            }

            /// Bit-serial compute; agrees with [`compute`] for every input.
            pub fn compute_bitserial(data: &[u8], start_value: $word, is_first_call: bool) -> $word {
                super::compute_bitserial(&$params, data, start_value as u64, is_first_call) as $word
            }
        }
    };
}

typed_variant!(crc8_j1850, CRC8_J1850, u8, 256);
typed_variant!(crc8_2f, CRC8_2F, u8, 256);
typed_variant!(crc16_ccitt_false, CRC16_CCITT_FALSE, u16, 256);
typed_variant!(crc16_arc, CRC16_ARC, u16, 256);
typed_variant!(crc32_ethernet, CRC32_ETHERNET, u32, 256);
typed_variant!(crc32_p4, CRC32_P4, u32, 256);
typed_variant!(crc64_ecma, CRC64_ECMA, u64, 256);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_values_match_the_canonical_vector() {
        for params in ALL {
            let table = build_table(params.poly, params.width);
            let got = compute_table(params, &table, b"123456789", 0, true);
            assert_eq!(got, params.check, "width {} poly {:#x}", params.width, params.poly);
            let got_bs = compute_bitserial(params, b"123456789", 0, true);
            assert_eq!(got_bs, params.check);
        }
    }

    #[test]
    fn chaining_law_holds_for_every_variant_and_partition() {
        let data = b"the quick brown fox jumps over the lazy dog, 1234567890";
        let partitions: &[&[usize]] = &[&[data.len()], &[1, data.len() - 1], &[3, 5, 7, data.len() - 15]];

        for params in ALL {
            let table = build_table(params.poly, params.width);
            let whole = compute_table(params, &table, data, 0, true);

            for lens in partitions {
                let mut offset = 0usize;
                let mut value = 0u64;
                let mut first = true;
                for &len in *lens {
                    let span = &data[offset..offset + len];
                    value = compute_table(params, &table, span, value, first);
                    first = false;
                    offset += len;
                }
                assert_eq!(value, whole, "chaining mismatch width {} partition {:?}", params.width, lens);
            }
        }
    }

    #[test]
    fn crc8_j1850_literal_vector() {
        // spec §8 scenario 1: CRC-8/J1850 over four zero bytes.
        assert_eq!(crc8_j1850::compute(&[0x00, 0x00, 0x00, 0x00], 0xFF, true), 0x59);

        // byte-by-byte continuation yields the same result.
        let mut v = crc8_j1850::compute(&[0x00], 0xFF, true);
        for _ in 0..3 {
            v = crc8_j1850::compute(&[0x00], v, false);
        }
        assert_eq!(v, 0x59);
    }

    #[test]
    fn crc16_ccitt_false_is_non_reflected() {
        assert!(!CRC16_CCITT_FALSE.refin);
        assert!(!CRC16_CCITT_FALSE.refout);
    }
}

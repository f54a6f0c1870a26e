//! Static DEFLATE tables (RFC 1951 Section 3.2.5 - 3.2.7).

use crate::huffman::{CodeKind, HuffmanTable};
use std::sync::OnceLock;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// Highest valid literal/length symbol.
pub const MAX_LENGTH_SYMBOL: u16 = 285;

/// Largest HLIT + 257 a dynamic header may announce.
pub const MAX_LITLEN_CODES: usize = 286;

/// Largest HDIST + 1 a dynamic header may announce.
pub const MAX_DISTANCE_CODES: usize = 30;

/// Length code base values for symbols 257-285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264
    11, 13, 15, 17, // 265-268
    19, 23, 27, 31, // 269-272
    35, 43, 51, 59, // 273-276
    67, 83, 99, 115, // 277-280
    131, 163, 195, 227, // 281-284
    258, // 285
];

/// Number of extra bits for length symbols 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, // 257-264
    1, 1, 1, 1, // 265-268
    2, 2, 2, 2, // 269-272
    3, 3, 3, 3, // 273-276
    4, 4, 4, 4, // 277-280
    5, 5, 5, 5, // 281-284
    0, // 285
];

/// Distance code base values for codes 0-29.
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Number of extra bits for distance codes 0-29.
pub const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which code length code lengths appear in a dynamic header.
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Fixed literal/length code lengths.
///
/// Symbols 286 and 287 complete the code but never appear in valid data.
fn fixed_litlen_lengths() -> [u8; 288] {
    let mut lengths = [8u8; 288];
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths
}

/// The fixed literal/length table, built once.
pub fn fixed_litlen_table() -> &'static HuffmanTable {
    static TABLE: OnceLock<HuffmanTable> = OnceLock::new();

    TABLE.get_or_init(|| {
        HuffmanTable::from_code_lengths(&fixed_litlen_lengths(), CodeKind::LiteralLength)
            .expect("fixed literal/length code is complete")
    })
}

/// The fixed distance table, built once.
///
/// All 32 five-bit codes are present; codes 30 and 31 are rejected when
/// decoded.
pub fn fixed_distance_table() -> &'static HuffmanTable {
    static TABLE: OnceLock<HuffmanTable> = OnceLock::new();

    TABLE.get_or_init(|| {
        HuffmanTable::from_code_lengths(&[5u8; 32], CodeKind::Distance)
            .expect("fixed distance code is complete")
    })
}

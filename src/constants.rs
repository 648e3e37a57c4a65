/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Maximum codeword length across all deflate Huffman codes.
pub const DEFLATE_MAX_CODEWORD_LENGTH: usize = 15;

/// Number of symbols in the code-length (precode) alphabet.
pub const DEFLATE_NUM_PRECODE_SYMS: usize = 19;

/// Number of symbols in the literal/length alphabet.
/// 0-255 are literals, 256 is end-of-block and 257-287 are length codes.
pub const DEFLATE_NUM_LITLEN_SYMS: usize = 288;

/// Maximum number of distance codes a block may declare.
/// Symbols 30 and 31 can be declared but never validly appear in a stream.
pub const DEFLATE_NUM_OFFSET_SYMS: usize = 32;

/// Size of the combined literal/length + distance code-length array.
///
/// A dynamic block declares at most 286 + 32 lengths, a static block
/// uses 288 + 30; both fit in 318 entries.
pub const DEFLATE_NUM_LITLEN_DIST_LENS: usize = 318;

pub const DEFLATE_BLOCKTYPE_UNCOMPRESSED: u64 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC: u64 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u64 = 2;

/// Order which precode lengths are stored in
pub static DEFLATE_PRECODE_LENS_PERMUTATION: [u8; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Base match lengths for the length codes 257..=285.
pub static DEFLATE_LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Number of extra length bits carried by the length codes 257..=285.
pub static DEFLATE_LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distances for the distance codes 0..=29.
pub static DEFLATE_DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Number of extra distance bits carried by the distance codes 0..=29.
pub static DEFLATE_DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Calculate the adler hash of the decoded data.
#[cfg(feature = "zlib")]
pub fn calc_adler_hash(data: &[u8]) -> u32
{
    use simd_adler32::Adler32;

    let mut hash = Adler32::new();

    hash.write(data);

    hash.finish()
}

/// Copy a back-reference of `length` bytes starting at `match_offset`
/// to `dest_offset`, one byte at a time.
///
/// As in most LZ77-based compressors, the length can be larger than the
/// distance, yielding a form of run-length encoding (RLE). For instance,
/// "xababab" could be encoded as
///
///   `<literal: "xab"> <copy: distance=2 length=4>`
///
/// Copying strictly byte by byte makes a byte written early in the copy
/// visible to a later read of the same copy:
///
/// ```text
///  match source  │
/// ───────────────│───────────────
///  [x{a}b]       │  [copy at = 3]
///  [xa{b}a]      │  [copy at = 4]
///  [xab{a}b]     │  [copy at = 5]
///  [xaba{b}a]    │  [copy at = 6]
/// ```
#[inline(always)]
pub fn copy_rep_matches(dest: &mut [u8], match_offset: usize, dest_offset: usize, length: usize)
{
    for i in 0..length
    {
        dest[dest_offset + i] = dest[match_offset + i];
    }
}

#[cfg(test)]
mod tests
{
    use super::copy_rep_matches;

    #[test]
    fn overlapping_copy_extends_the_run()
    {
        let mut buf = [b'x', b'a', b'b', 0, 0, 0, 0];

        copy_rep_matches(&mut buf, 1, 3, 4);

        assert_eq!(&buf, b"xababab");
    }

    #[test]
    fn distance_one_repeats_the_last_byte()
    {
        let mut buf = [b'a', 0, 0, 0];

        copy_rep_matches(&mut buf, 0, 1, 3);

        assert_eq!(&buf, b"aaaa");
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::trace;
#[cfg(feature = "zlib")]
use log::warn;

use crate::bitstream::BitStreamReader;
use crate::constants::{
    DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_DISTANCE_BASE, DEFLATE_DISTANCE_EXTRA_BITS, DEFLATE_LENGTH_BASE,
    DEFLATE_LENGTH_EXTRA_BITS, DEFLATE_MAX_CODEWORD_LENGTH, DEFLATE_NUM_LITLEN_DIST_LENS,
    DEFLATE_NUM_LITLEN_SYMS, DEFLATE_NUM_OFFSET_SYMS, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION
};
use crate::errors::DecodeErrorStatus;
#[cfg(feature = "zlib")]
use crate::utils::calc_adler_hash;
use crate::utils::copy_rep_matches;

/// Runtime options for the decoder.
#[derive(Debug, Copy, Clone)]
pub struct DeflateOptions
{
    confirm_checksum: bool,
    size_hint:        usize
}

impl Default for DeflateOptions
{
    fn default() -> Self
    {
        DeflateOptions {
            confirm_checksum: true,
            size_hint:        1 << 16
        }
    }
}

impl DeflateOptions
{
    /// Whether the decoder should confirm that the adler32 checksum of
    /// the decoded output matches the stored one.
    ///
    /// Default is true
    #[must_use]
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self
    {
        self.confirm_checksum = yes;
        self
    }

    /// Size of the buffer the `Vec` returning convenience wrappers
    /// allocate, and hence the largest output they can produce.
    ///
    /// Default is 64 KiB, the largest output the embedded targets this
    /// crate is written for deal in.
    #[must_use]
    pub fn set_size_hint(mut self, hint: usize) -> Self
    {
        self.size_hint = hint;
        self
    }
}

/// A canonical huffman alphabet, described by an array of per-symbol
/// code lengths (0 = symbol unused).
///
/// Stores the per-length code counts and the smallest code value of each
/// length (RFC 1951 §3.2.2). That is all that is needed to recognize a
/// code in the bitstream; the symbol it maps to is found either by
/// scanning the code-length array (table-free mode) or, with the `lut`
/// feature, through a flat index of symbols in (length, symbol) order.
pub(crate) struct HuffmanAlphabet<const NUM_SYMS: usize>
{
    bl_count:   [u16; DEFLATE_MAX_CODEWORD_LENGTH + 1],
    next_code:  [u16; DEFLATE_MAX_CODEWORD_LENGTH + 1],
    max_length: usize,
    #[cfg(feature = "lut")]
    codes:      [u16; NUM_SYMS]
}

impl<const NUM_SYMS: usize> HuffmanAlphabet<NUM_SYMS>
{
    pub(crate) fn new() -> HuffmanAlphabet<NUM_SYMS>
    {
        HuffmanAlphabet {
            bl_count:   [0; DEFLATE_MAX_CODEWORD_LENGTH + 1],
            next_code:  [0; DEFLATE_MAX_CODEWORD_LENGTH + 1],
            max_length: 0,
            #[cfg(feature = "lut")]
            codes:      [0; NUM_SYMS]
        }
    }

    /// Build the canonical code data from `lengths`.
    ///
    /// Over-subscribed codes are rejected, under-full ones are not; a
    /// prefix that maps to unused codespace is caught at decode time
    /// instead.
    pub(crate) fn build_from_lengths(&mut self, lengths: &[u8]) -> Result<(), DecodeErrorStatus>
    {
        debug_assert!(lengths.len() <= NUM_SYMS);

        self.bl_count = [0; DEFLATE_MAX_CODEWORD_LENGTH + 1];
        self.max_length = 0;

        for length in lengths
        {
            let length = usize::from(*length);

            debug_assert!(length <= DEFLATE_MAX_CODEWORD_LENGTH);

            if length != 0
            {
                self.bl_count[length] += 1;
                self.max_length = self.max_length.max(length);
            }
        }

        // A codeword of length n claims 1/2^n of the codespace, anything
        // above a full codespace cannot be decoded unambiguously.
        let mut codespace_used = 0_u32;

        for length in 1..=DEFLATE_MAX_CODEWORD_LENGTH
        {
            codespace_used = (codespace_used << 1) + u32::from(self.bl_count[length]);
        }

        if codespace_used > 1 << DEFLATE_MAX_CODEWORD_LENGTH
        {
            return Err(DecodeErrorStatus::CorruptData);
        }

        self.next_code = [0; DEFLATE_MAX_CODEWORD_LENGTH + 1];

        let mut code = 0_u16;

        for length in 1..=self.max_length
        {
            code = (code + self.bl_count[length - 1]) << 1;

            self.next_code[length] = code;
        }

        #[cfg(feature = "lut")]
        {
            let mut code_pos = 0;

            for bit_length in 1..=self.max_length
            {
                for (symbol, length) in lengths.iter().enumerate()
                {
                    if usize::from(*length) == bit_length
                    {
                        self.codes[code_pos] = symbol as u16;
                        code_pos += 1;
                    }
                }
            }
        }

        Ok(())
    }

    /// Decode the next huffman code from the bitstream and return its
    /// symbol index.
    ///
    /// The caller must have refilled the stream recently enough that
    /// every remaining input bit the code could span is buffered; this
    /// is what lets a code running past the real end of input be told
    /// apart from one that merely maps to unused codespace.
    pub(crate) fn decode_symbol(
        &self, stream: &mut BitStreamReader, lengths: &[u8]
    ) -> Result<u16, DecodeErrorStatus>
    {
        debug_assert!(lengths.len() <= NUM_SYMS);

        let window = stream.peek_bits::<DEFLATE_MAX_CODEWORD_LENGTH>() as u16;

        // Huffman codes are packed MSB first into the LSB first stream,
        // so the code value is assembled in reverse while walking the
        // candidate lengths.
        let mut code = 0_u16;
        let mut offset = 0_u16;

        for length in 1..=self.max_length
        {
            code = (code << 1) | ((window >> (length - 1)) & 1);

            let count = self.bl_count[length];
            let first = self.next_code[length];

            if count != 0 && code >= first && code < first + count
            {
                if !stream.has(length as u8)
                {
                    // the matched code spans bits the input does not have
                    return Err(DecodeErrorStatus::InsufficientData);
                }
                stream.drop_bits(length as u8);

                let rel = code - first;

                #[cfg(feature = "lut")]
                {
                    return Ok(self.codes[usize::from(offset + rel)]);
                }

                #[cfg(not(feature = "lut"))]
                {
                    // find the rel-th symbol of this code length
                    let mut remaining = rel;

                    for (symbol, sym_length) in lengths.iter().enumerate()
                    {
                        if usize::from(*sym_length) == length
                        {
                            if remaining == 0
                            {
                                return Ok(symbol as u16);
                            }
                            remaining -= 1;
                        }
                    }
                    // bl_count promised more codes of this length than
                    // the length array holds
                    return Err(DecodeErrorStatus::CorruptData);
                }
            }
            offset += count;
        }

        if !stream.has(self.max_length as u8)
        {
            // the code might have matched had the input not ended
            return Err(DecodeErrorStatus::InsufficientData);
        }
        Err(DecodeErrorStatus::InvalidHuffmanCode)
    }
}

/// A deflate decoder instance.
///
/// The whole compressed payload must be present up front; decoding is a
/// single synchronous pass into a caller-supplied output buffer.
pub struct DeflateDecoder<'a>
{
    data:                &'a [u8],
    position:            usize,
    stream:              BitStreamReader<'a>,
    is_last_block:       bool,
    static_codes_loaded: bool,
    options:             DeflateOptions
}

impl<'a> DeflateDecoder<'a>
{
    /// Create a new decoder over `data` with default options.
    pub fn new(data: &'a [u8]) -> DeflateDecoder<'a>
    {
        DeflateDecoder::new_with_options(data, DeflateOptions::default())
    }

    /// Create a new decoder over `data` with the given options.
    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> DeflateDecoder<'a>
    {
        DeflateDecoder {
            data,
            position: 0,
            stream: BitStreamReader::new(data),
            is_last_block: false,
            static_codes_loaded: false,
            options
        }
    }

    /// Decode a zlib-wrapped deflate stream (RFC 1950) into `output`,
    /// returning the number of bytes produced.
    ///
    /// The adler32 trailer is verified unless switched off via
    /// [`DeflateOptions::set_confirm_checksum`].
    #[cfg(feature = "zlib")]
    pub fn decode_zlib_into(&mut self, output: &mut [u8]) -> Result<usize, DecodeErrorStatus>
    {
        if self.data.len()
            < 2 /* zlib header */
            + 4
        /* Adler32 */
        {
            return Err(DecodeErrorStatus::InsufficientData);
        }

        // Zlib flags
        // See https://www.ietf.org/rfc/rfc1950.txt for
        // the RFC
        let cmf = self.data[0];
        let flg = self.data[1];

        let cm = cmf & 0xF;
        let cinfo = cmf >> 4;

        let fdict = (flg >> 5) & 1;

        // confirm we have the right deflate method
        if cm != 8
        {
            return Err(DecodeErrorStatus::UnknownCompressionMethod(cm));
        }
        // windows greater than 32 KiB are not allowed
        if cinfo > 7
        {
            return Err(DecodeErrorStatus::CorruptData);
        }
        if fdict != 0
        {
            return Err(DecodeErrorStatus::PresetDictionaryUnsupported);
        }

        let flag_checks = (u16::from(cmf) * 256) + u16::from(flg);

        if flag_checks % 31 != 0
        {
            return Err(DecodeErrorStatus::CorruptZlibHeader);
        }

        self.position = 2;

        let produced = self.decode_blocks(output)?;

        if self.options.confirm_checksum
        {
            self.confirm_adler(&output[..produced])?;
        }
        else
        {
            warn!("skipping adler32 confirmation of the decoded output");
        }

        Ok(produced)
    }

    /// Decode a raw deflate stream (RFC 1951) into `output`, returning
    /// the number of bytes produced.
    pub fn decode_deflate_into(&mut self, output: &mut [u8]) -> Result<usize, DecodeErrorStatus>
    {
        self.position = 0;

        self.decode_blocks(output)
    }

    /// Decode a zlib-wrapped deflate stream into a fresh vector.
    ///
    /// The vector is sized by [`DeflateOptions::set_size_hint`], which
    /// bounds the output this call can produce.
    #[cfg(all(feature = "std", feature = "zlib"))]
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, DecodeErrorStatus>
    {
        let mut output = vec![0_u8; self.options.size_hint];

        let produced = self.decode_zlib_into(&mut output)?;

        output.truncate(produced);

        Ok(output)
    }

    /// Decode a raw deflate stream into a fresh vector.
    ///
    /// The vector is sized by [`DeflateOptions::set_size_hint`], which
    /// bounds the output this call can produce.
    #[cfg(feature = "std")]
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, DecodeErrorStatus>
    {
        let mut output = vec![0_u8; self.options.size_hint];

        let produced = self.decode_deflate_into(&mut output)?;

        output.truncate(produced);

        Ok(output)
    }

    /// Run the block loop until a final block completes.
    fn decode_blocks(&mut self, output: &mut [u8]) -> Result<usize, DecodeErrorStatus>
    {
        // the smallest deflate stream, an empty static block, is two bytes
        if self.data.len() < self.position + 2
        {
            return Err(DecodeErrorStatus::InsufficientData);
        }

        // re-read the stream so that we skip bytes read by the zlib header check
        self.stream = BitStreamReader::new(&self.data[self.position..]);
        self.is_last_block = false;
        self.static_codes_loaded = false;

        let mut lens = [0_u8; DEFLATE_NUM_LITLEN_DIST_LENS];

        let mut precode_alphabet = HuffmanAlphabet::<DEFLATE_NUM_PRECODE_SYMS>::new();
        let mut litlen_alphabet = HuffmanAlphabet::<DEFLATE_NUM_LITLEN_SYMS>::new();
        let mut offset_alphabet = HuffmanAlphabet::<DEFLATE_NUM_OFFSET_SYMS>::new();

        let mut num_litlen_syms = 0_usize;
        let mut num_offset_syms = 0_usize;

        let mut out_position = 0_usize;

        loop
        {
            self.stream.refill();

            if !self.stream.has(3)
            {
                return Err(DecodeErrorStatus::InsufficientData);
            }

            self.is_last_block = self.stream.get_bits(1) == 1;
            let block_type = self.stream.get_bits(2);

            trace!("block type {block_type}, last {}", self.is_last_block);

            if block_type == DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN
            {
                // Dynamic huffman block, the two payload alphabets are
                // themselves huffman coded (RFC 1951 §3.2.7).
                if !self.stream.has(14)
                {
                    return Err(DecodeErrorStatus::InsufficientData);
                }

                num_litlen_syms = 257 + self.stream.get_bits(5) as usize;
                num_offset_syms = 1 + self.stream.get_bits(5) as usize;

                let num_explicit_precode_lens = 4 + self.stream.get_bits(4) as usize;

                if num_litlen_syms > 286
                {
                    return Err(DecodeErrorStatus::CorruptData);
                }

                self.static_codes_loaded = false;

                let mut precode_lens = [0_u8; DEFLATE_NUM_PRECODE_SYMS];

                for i in DEFLATE_PRECODE_LENS_PERMUTATION
                    .iter()
                    .take(num_explicit_precode_lens)
                {
                    let bits = self.read_extra_bits(3)? as u8;

                    precode_lens[usize::from(*i)] = bits;
                }

                precode_alphabet.build_from_lengths(&precode_lens)?;

                /* Decode the litlen and offset codeword lengths. */

                let expected = num_litlen_syms + num_offset_syms;
                let mut i = 0;

                while i < expected
                {
                    self.stream.refill();

                    let presym = precode_alphabet.decode_symbol(&mut self.stream, &precode_lens)?;

                    if presym < 16
                    {
                        // explicit codeword length
                        lens[i] = presym as u8;
                        i += 1;
                        continue;
                    }

                    /* Run-length encoded codeword lengths */

                    let rep_val: u8;
                    let rep_count: usize;

                    if presym == 16
                    {
                        // repeat the previous length 3 to 6 times
                        if i == 0
                        {
                            // there is no previous length yet
                            return Err(DecodeErrorStatus::CorruptData);
                        }
                        rep_val = lens[i - 1];
                        rep_count = 3 + usize::from(self.read_extra_bits(2)?);
                    }
                    else if presym == 17
                    {
                        // repeat zero 3 to 10 times
                        rep_val = 0;
                        rep_count = 3 + usize::from(self.read_extra_bits(3)?);
                    }
                    else
                    {
                        // repeat zero 11 to 138 times
                        rep_val = 0;
                        rep_count = 11 + usize::from(self.read_extra_bits(7)?);
                    }

                    if i + rep_count > expected
                    {
                        // the repeat spills past the declared alphabet sizes
                        return Err(DecodeErrorStatus::CorruptData);
                    }

                    lens[i..i + rep_count].fill(rep_val);
                    i += rep_count;
                }

                litlen_alphabet.build_from_lengths(&lens[..num_litlen_syms])?;
                offset_alphabet.build_from_lengths(
                    &lens[num_litlen_syms..num_litlen_syms + num_offset_syms]
                )?;
            }
            else if block_type == DEFLATE_BLOCKTYPE_UNCOMPRESSED
            {
                self.decode_stored_block(output, &mut out_position)?;

                if self.is_last_block
                {
                    break;
                }
                continue;
            }
            else if block_type == DEFLATE_BLOCKTYPE_STATIC
            {
                if !self.static_codes_loaded
                {
                    // fixed codes, RFC 1951 §3.2.6
                    lens[000..144].fill(8);
                    lens[144..256].fill(9);
                    lens[256..280].fill(7);
                    lens[280..288].fill(8);
                    lens[288..].fill(5);

                    num_litlen_syms = DEFLATE_NUM_LITLEN_SYMS;
                    num_offset_syms = 30;

                    litlen_alphabet.build_from_lengths(&lens[..num_litlen_syms])?;
                    offset_alphabet.build_from_lengths(
                        &lens[num_litlen_syms..num_litlen_syms + num_offset_syms]
                    )?;

                    self.static_codes_loaded = true;
                }
            }
            else
            {
                return Err(DecodeErrorStatus::InvalidBlockType(block_type as u8));
            }

            let (litlen_lens, offset_lens) = lens.split_at(num_litlen_syms);

            self.decode_huffman_payload(
                &litlen_alphabet,
                &offset_alphabet,
                litlen_lens,
                &offset_lens[..num_offset_syms],
                output,
                &mut out_position
            )?;

            if self.is_last_block
            {
                break;
            }
        }

        trace!("decoded {out_position} bytes");

        Ok(out_position)
    }

    /// Decode an uncompressed block (RFC 1951 §3.2.4).
    fn decode_stored_block(
        &mut self, output: &mut [u8], out_position: &mut usize
    ) -> Result<(), DecodeErrorStatus>
    {
        /*
         * Align the bitstream to the next byte boundary and read LEN and
         * NLEN. The copy source is located through the byte cursor, after
         * which the bit reader is re-seeked past the copied bytes.
         */
        self.stream.align_to_byte();

        if !self.stream.has(32)
        {
            self.stream.refill();
        }
        if !self.stream.has(32)
        {
            return Err(DecodeErrorStatus::InsufficientData);
        }

        let len = self.stream.get_bits(16) as u16;
        let nlen = self.stream.get_bits(16) as u16;

        if len != !nlen
        {
            return Err(DecodeErrorStatus::MismatchedStoredLength(len, nlen));
        }

        let len = usize::from(len);
        let start = self.stream.byte_position();
        let src = &self.data[self.position..];

        if start + len > src.len()
        {
            return Err(DecodeErrorStatus::InsufficientData);
        }
        if *out_position + len > output.len()
        {
            return Err(DecodeErrorStatus::OutputLimitExceeded(
                output.len(),
                *out_position + len
            ));
        }

        output[*out_position..*out_position + len].copy_from_slice(&src[start..start + len]);
        *out_position += len;

        self.stream.seek(start + len);

        Ok(())
    }

    /// Decode the huffman coded payload of a static or dynamic block
    /// (RFC 1951 §3.2.3): literals, end-of-block and length/distance
    /// back-references.
    fn decode_huffman_payload(
        &mut self, litlen_alphabet: &HuffmanAlphabet<DEFLATE_NUM_LITLEN_SYMS>,
        offset_alphabet: &HuffmanAlphabet<DEFLATE_NUM_OFFSET_SYMS>, litlen_lens: &[u8],
        offset_lens: &[u8], output: &mut [u8], out_position: &mut usize
    ) -> Result<(), DecodeErrorStatus>
    {
        loop
        {
            self.stream.refill();

            let symbol = litlen_alphabet.decode_symbol(&mut self.stream, litlen_lens)?;

            if symbol < 256
            {
                // literal byte
                if *out_position >= output.len()
                {
                    return Err(DecodeErrorStatus::OutputLimitExceeded(
                        output.len(),
                        *out_position + 1
                    ));
                }
                output[*out_position] = symbol as u8;
                *out_position += 1;

                continue;
            }
            if symbol == 256
            {
                // end of block
                return Ok(());
            }

            // a length/distance pair, symbol is 257..=287
            let length_index = usize::from(symbol) - 257;

            if length_index >= DEFLATE_LENGTH_BASE.len()
            {
                // symbols 286 and 287 never appear in a valid stream
                return Err(DecodeErrorStatus::CorruptData);
            }

            let mut length = usize::from(DEFLATE_LENGTH_BASE[length_index]);
            let length_extra = DEFLATE_LENGTH_EXTRA_BITS[length_index];

            if length_extra > 0
            {
                length += usize::from(self.read_extra_bits(length_extra)?);
            }

            // one refill per round trip is enough for both symbols, a
            // litlen code plus its extra bits consume at most 20 bits
            let offset_symbol =
                usize::from(offset_alphabet.decode_symbol(&mut self.stream, offset_lens)?);

            if offset_symbol >= DEFLATE_DISTANCE_BASE.len()
            {
                // symbols 30 and 31 never appear in a valid stream
                return Err(DecodeErrorStatus::CorruptData);
            }

            let mut distance = usize::from(DEFLATE_DISTANCE_BASE[offset_symbol]);
            let distance_extra = DEFLATE_DISTANCE_EXTRA_BITS[offset_symbol];

            if distance_extra > 0
            {
                distance += usize::from(self.read_extra_bits(distance_extra)?);
            }

            if distance > *out_position
            {
                // the back-reference starts before the output buffer
                return Err(DecodeErrorStatus::CorruptData);
            }
            if *out_position + length > output.len()
            {
                return Err(DecodeErrorStatus::OutputLimitExceeded(
                    output.len(),
                    *out_position + length
                ));
            }

            copy_rep_matches(output, *out_position - distance, *out_position, length);

            *out_position += length;
        }
    }

    /// Read `count` literal bits, refilling if needed.
    fn read_extra_bits(&mut self, count: u8) -> Result<u16, DecodeErrorStatus>
    {
        if !self.stream.has(count)
        {
            self.stream.refill();

            if !self.stream.has(count)
            {
                return Err(DecodeErrorStatus::InsufficientData);
            }
        }
        Ok(self.stream.get_bits(count) as u16)
    }

    /// Verify the adler32 trailer against the produced output.
    #[cfg(feature = "zlib")]
    fn confirm_adler(&mut self, output: &[u8]) -> Result<(), DecodeErrorStatus>
    {
        self.stream.align_to_byte();

        let trailer_start = self.position + self.stream.byte_position();

        let trailer = match self.data.get(trailer_start..trailer_start + 4)
        {
            Some(bytes) => bytes,
            None => return Err(DecodeErrorStatus::InsufficientData)
        };

        let expected =
            u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let found = calc_adler_hash(output);

        if expected != found
        {
            return Err(DecodeErrorStatus::MismatchedAdler(expected, found));
        }
        Ok(())
    }
}

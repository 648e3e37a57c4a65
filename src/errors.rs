/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Reasons why decompression may fail.
///
/// Errors are terminal: once a decode call returns one of these the
/// contents of the output buffer are unspecified up to the position
/// reached and must not be consumed.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum DecodeErrorStatus
{
    /// Input data ended, or was too short to begin with, in the middle
    /// of a stream
    InsufficientData,
    /// Input data was malformed in a way that has no more specific kind
    CorruptData,
    /// The output buffer filled up before the stream ended
    OutputLimitExceeded(usize, usize),
    /// The zlib header carries a compression method other than 8 (deflate)
    UnknownCompressionMethod(u8),
    /// The zlib header requests a preset dictionary, which is rejected
    /// rather than supported
    PresetDictionaryUnsupported,
    /// The zlib header fails its mod-31 check
    CorruptZlibHeader,
    /// A block header carries the reserved block type 3
    InvalidBlockType(u8),
    /// A stored block's NLEN field is not the complement of its LEN field
    MismatchedStoredLength(u16, u16),
    /// No huffman code of length 15 or less matches the input at the
    /// current position
    InvalidHuffmanCode,
    /// Output adler32 does not match the stored adler32.
    ///
    /// Only present for zlib
    MismatchedAdler(u32, u32)
}

impl Debug for DecodeErrorStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::InsufficientData => writeln!(f, "Insufficient data"),
            Self::CorruptData => writeln!(f, "Corrupt data"),
            Self::OutputLimitExceeded(limit, current) => writeln!(
                f,
                "Output limit exceeded, set limit was {limit} and output size is {current}"
            ),
            Self::UnknownCompressionMethod(cm) =>
            {
                writeln!(f, "Unknown zlib compression method {cm}")
            }
            Self::PresetDictionaryUnsupported =>
            {
                writeln!(f, "Preset dictionaries are not supported")
            }
            Self::CorruptZlibHeader => writeln!(f, "FCHECK integrity not preserved"),
            Self::InvalidBlockType(block_type) =>
            {
                writeln!(f, "Invalid block type {block_type}")
            }
            Self::MismatchedStoredLength(len, nlen) =>
            {
                writeln!(f, "LEN {len:#06x} and NLEN {nlen:#06x} do not match")
            }
            Self::InvalidHuffmanCode => writeln!(f, "Invalid huffman code"),
            Self::MismatchedAdler(expected, found) =>
            {
                writeln!(f, "Mismatched adler, expected {expected} but found {found}")
            }
        }
    }
}

impl Display for DecodeErrorStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeErrorStatus {}

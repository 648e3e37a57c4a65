/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Error taxonomy checks: every malformed input maps to a defined error,
//! never to a panic or to wrong output.

use microflate::errors::DecodeErrorStatus;
use microflate::DeflateDecoder;

const HELLO_ZLIB: [u8; 13] = [
    0x78, 0x9c, 0xf3, 0x48, 0xcd, 0xc9, 0xc9, 0x07, 0x00, 0x05, 0x8c, 0x01, 0xf5,
];

fn decode_zlib(data: &[u8]) -> Result<usize, DecodeErrorStatus>
{
    let mut output = [0_u8; 64];

    DeflateDecoder::new(data).decode_zlib_into(&mut output)
}

fn decode_deflate(data: &[u8]) -> Result<usize, DecodeErrorStatus>
{
    let mut output = [0_u8; 64];

    DeflateDecoder::new(data).decode_deflate_into(&mut output)
}

#[test]
fn zlib_method_other_than_deflate()
{
    assert_eq!(
        decode_zlib(&[0x77, 0x01, 0, 0, 0, 0]),
        Err(DecodeErrorStatus::UnknownCompressionMethod(7))
    );
}

#[test]
fn zlib_window_too_large()
{
    assert_eq!(
        decode_zlib(&[0x88, 0x00, 0, 0, 0, 0]),
        Err(DecodeErrorStatus::CorruptData)
    );
}

#[test]
fn zlib_preset_dictionary()
{
    // 0x7820 passes the mod-31 check, only FDICT is objectionable
    assert_eq!(
        decode_zlib(&[0x78, 0x20, 0, 0, 0, 0]),
        Err(DecodeErrorStatus::PresetDictionaryUnsupported)
    );
}

#[test]
fn zlib_failed_fcheck()
{
    assert_eq!(
        decode_zlib(&[0x78, 0x9d, 0, 0, 0, 0]),
        Err(DecodeErrorStatus::CorruptZlibHeader)
    );
}

#[test]
fn reserved_block_type()
{
    assert_eq!(
        decode_deflate(&[0x07, 0x00]),
        Err(DecodeErrorStatus::InvalidBlockType(3))
    );
}

#[test]
fn stored_block_with_wrong_nlen()
{
    assert_eq!(
        decode_deflate(&[0x01, 0x04, 0x00, 0xfa, 0xff, 0, 0, 0, 0]),
        Err(DecodeErrorStatus::MismatchedStoredLength(4, 0xFFFA))
    );
}

#[test]
fn stored_block_longer_than_input()
{
    // LEN = 5 but only four payload bytes follow
    assert_eq!(
        decode_deflate(&[0x01, 0x05, 0x00, 0xfa, 0xff, b'T', b'E', b'S', b'T']),
        Err(DecodeErrorStatus::InsufficientData)
    );
}

#[test]
fn empty_and_tiny_inputs()
{
    assert_eq!(decode_deflate(&[]), Err(DecodeErrorStatus::InsufficientData));
    assert_eq!(
        decode_deflate(&[0x01]),
        Err(DecodeErrorStatus::InsufficientData)
    );
    assert_eq!(decode_zlib(&[]), Err(DecodeErrorStatus::InsufficientData));
    assert_eq!(
        decode_zlib(&[0x78, 0x9c, 0x03]),
        Err(DecodeErrorStatus::InsufficientData)
    );
}

/// Every strict prefix of a valid stream must come back as
/// `InsufficientData`, never as a crash or as output.
#[test]
fn truncated_streams_report_insufficient_data()
{
    for cut in 0..HELLO_ZLIB.len()
    {
        assert_eq!(
            decode_zlib(&HELLO_ZLIB[..cut]),
            Err(DecodeErrorStatus::InsufficientData),
            "prefix length {cut}"
        );
    }
}

/// Flipping any single bit of a checksummed stream either fails or
/// decodes to the exact same output; it never silently yields different
/// data.
#[test]
fn single_bit_corruption_never_changes_accepted_output()
{
    for byte_index in 0..HELLO_ZLIB.len()
    {
        for bit in 0..8
        {
            let mut corrupted = HELLO_ZLIB;
            corrupted[byte_index] ^= 1 << bit;

            let mut output = [0_u8; 64];
            let mut decoder = DeflateDecoder::new(&corrupted);

            if let Ok(produced) = decoder.decode_zlib_into(&mut output)
            {
                assert_eq!(&output[..produced], b"Hello", "byte {byte_index} bit {bit}");
            }
        }
    }
}

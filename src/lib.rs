/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An allocation-free deflate decoder for tight places.
//!
//! This crate decompresses whole DEFLATE (RFC 1951) payloads, optionally
//! carried in zlib framing (RFC 1950), into a caller-provided buffer.
//! It never allocates, never touches I/O and keeps its working state in a
//! few hundred bytes of stack, which makes it usable from `#![no_std]`
//! firmware all the way down to 8-bit microcontrollers.
//!
//! Use it if
//! - You need to inflate into a fixed buffer you already own
//! - You have no allocator, or no `std`
//! - You care more about RAM than about decode speed
//!
//! # Usage
//!
//! Decoding zlib data into a buffer
//!
//! ```no_run
//! use microflate::DeflateDecoder;
//! let totally_valid_data = [0; 23];
//! let mut output = [0; 100];
//!
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//! let produced = decoder.decode_zlib_into(&mut output);
//! ```
//!
//! Decoding raw deflate data
//!
//! ```no_run
//! use microflate::DeflateDecoder;
//! let totally_valid_data = [0; 23];
//! let mut output = [0; 100];
//!
//! let mut decoder = DeflateDecoder::new(&totally_valid_data);
//! let produced = decoder.decode_deflate_into(&mut output);
//! ```
//!
//! Decoding zlib data without confirming the adler32 checksum
//!
//! ```no_run
//! use microflate::DeflateDecoder;
//! use microflate::DeflateOptions;
//! let totally_valid_data = [0; 23];
//! let mut output = [0; 100];
//!
//! let options = DeflateOptions::default().set_confirm_checksum(false);
//! let mut decoder = DeflateDecoder::new_with_options(&totally_valid_data, options);
//! let produced = decoder.decode_zlib_into(&mut output);
//! ```
//!
//! # Features
//!
//! - `zlib`: zlib framing and adler32 verification, pulls in `simd-adler32`.
//!    On by default.
//! - `std`: disables `#![no_std]` and adds `Vec` returning convenience
//!    wrappers. On by default.
//! - `lut`: keep a flat symbol lookup table per alphabet, trading about
//!    650 bytes of RAM for a large decode speed-up. Off by default.
#![cfg_attr(not(feature = "std"), no_std)]

pub use crate::decoder::{DeflateDecoder, DeflateOptions};

mod bitstream;
mod constants;
mod decoder;
pub mod errors;
mod utils;

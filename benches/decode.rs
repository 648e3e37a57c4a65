/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::prelude::*;
use std::io::Cursor;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn generate_corpus() -> Vec<u8>
{
    let paragraph = b"A deflate stream is a sequence of blocks, each stored, \
                      fixed huffman or dynamic huffman coded. Back-references \
                      reach up to 32768 bytes into the produced output. ";

    paragraph
        .iter()
        .cycle()
        .take(4 * (1 << 20))
        .copied()
        .collect()
}

fn decode_writer_flate(bytes: &[u8]) -> Vec<u8>
{
    let mut writer = Vec::new();

    let mut deflater = flate2::read::ZlibDecoder::new(Cursor::new(bytes));

    deflater.read_to_end(&mut writer).unwrap();

    writer
}

fn decode_writer_microflate(bytes: &[u8], output: &mut [u8]) -> usize
{
    let options = microflate::DeflateOptions::default();
    let mut deflater = microflate::DeflateDecoder::new_with_options(bytes, options);

    deflater.decode_zlib_into(output).unwrap()
}

fn decode_test(c: &mut Criterion)
{
    let corpus = generate_corpus();

    let mut compressed = Vec::new();
    let mut encoder =
        flate2::write::ZlibEncoder::new(&mut compressed, flate2::Compression::default());
    encoder.write_all(&corpus).unwrap();
    encoder.finish().unwrap();

    let mut output = vec![0_u8; corpus.len()];

    let mut group = c.benchmark_group("ZLIB decoding");
    group.throughput(Throughput::Bytes(compressed.len() as u64));

    group.bench_function("FLATE-[miniz-oxide]", |b| {
        b.iter(|| black_box(decode_writer_flate(compressed.as_slice())))
    });

    group.bench_function("MICROFLATE", |b| {
        b.iter(|| black_box(decode_writer_microflate(compressed.as_slice(), &mut output)))
    });
}
criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=decode_test);

criterion_main!(benches);

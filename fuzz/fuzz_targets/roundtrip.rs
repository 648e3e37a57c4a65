#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10
    {
        let compression_level = data[0];
        let data = &data[1..];
        let compressed = miniz_oxide::deflate::compress_to_vec(data, compression_level);

        let mut output = vec![0; data.len()];
        let mut decoder = microflate::DeflateDecoder::new(&compressed);
        let decoded = decoder
            .decode_deflate_into(&mut output)
            .expect("Failed to decompress valid compressed data!");

        assert!(
            data == &output[..decoded],
            "The decompressed data doesn't match the original data!"
        );
    }
});

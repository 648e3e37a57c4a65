#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut output = [0_u8; 1 << 16];
    let mut decoder = microflate::DeflateDecoder::new(data);
    let _result = decoder.decode_zlib_into(&mut output);
});

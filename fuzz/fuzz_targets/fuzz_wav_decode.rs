#![no_main]

use libfuzzer_sys::fuzz_target;
use memetune_backend_audio::wav::{data_chunk, decode_wav};

fuzz_target!(|data: &[u8]| {
    let _ = data_chunk(data);
    if let Ok(wave) = decode_wav(data) {
        let _ = wave.peak();
    }
});

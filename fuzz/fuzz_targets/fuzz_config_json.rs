#![no_main]

use libfuzzer_sys::fuzz_target;
use memetune_spec::{GenerationConfig, Limits};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = GenerationConfig::from_json(text) {
        let _ = config.validate_with_limits(&Limits::default());
        let _ = config.resolved_seed();
        if let Ok(json) = config.to_json_pretty() {
            let _ = serde_json::from_str::<serde_json::Value>(&json);
        }
    }
});

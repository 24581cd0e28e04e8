// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz FaultlineConfig TOML parsing and validation.
//!
//! Feeds arbitrary byte strings through `parse_toml` and `validate_config`,
//! verifying:
//! 1. `parse_toml` never panics on arbitrary input.
//! 2. Successfully parsed configs can be validated without panics.
//! 3. Round-trip: serialize back to TOML and re-parse produces the same config.
//! 4. Configs that validate produce render options inside the accepted range.
#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1: parse_toml never panics ---
    let config = match fl_config::parse_toml(s) {
        Ok(c) => c,
        Err(_) => return,
    };

    // --- Property 2 and 4 ---
    match fl_config::validate_config(&config) {
        Ok(warnings) => {
            for w in &warnings {
                let _ = format!("{w}");
            }
            let opts = config.to_render_options();
            assert!(opts.max_depth >= 1 && opts.max_depth <= fl_config::MAX_RENDER_DEPTH);
        }
        Err(e) => {
            let _ = format!("{e}");
        }
    }

    // --- Property 3: round-trip through TOML serialization ---
    if let Ok(toml_str) = toml::to_string(&config) {
        if let Ok(rt) = fl_config::parse_toml(&toml_str) {
            assert_eq!(config, rt, "TOML round-trip must be lossless");
        }
    }
});

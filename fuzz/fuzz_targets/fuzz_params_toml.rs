//! Fuzz target for params.toml parsing and validation.

#![no_main]

use af_config::{validate_params_file, ParamsFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(file) = ParamsFile::from_toml_str(text) {
        let _ = validate_params_file(&file);
    }
});

//! Fuzz target for params.json parsing and validation.
//!
//! Arbitrary bytes must only ever produce a parse or validation error.

#![no_main]

use af_config::{validate_parameters, validate_params_file, ParamsFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(file) = ParamsFile::from_json_str(text) {
        if validate_params_file(&file).is_ok() {
            let _ = validate_parameters(&file.effective_parameters());
        }
    }
});

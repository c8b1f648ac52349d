#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use typecycle::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // Only panics matter; every Err is a valid outcome
        let _ = ConfigLoader::with_defaults().load_str(yaml, Path::new("fuzz.yaml"));
    }
});

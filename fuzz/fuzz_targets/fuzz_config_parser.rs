#![no_main]

use collabgate_core::config::{parse_repository, AccessConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = AccessConfig::from_yaml(text) {
        if config.validate().is_ok() {
            let body = config.render_granted_comment("fuzz-user");
            assert!(body.contains("fuzz-user"));
            let _ = config.render_duplicate_comment("fuzz-user");
        }
    }

    if let Some(line) = text.lines().next() {
        if let Ok(repo) = parse_repository(line) {
            assert!(!repo.owner.is_empty());
            assert!(!repo.name.contains('/'));
        }
    }
});

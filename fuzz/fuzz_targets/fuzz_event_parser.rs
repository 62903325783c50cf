#![no_main]

use collabgate_core::event::parse_event;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Arbitrary payloads must parse or fail, never panic
        if let Ok(event) = parse_event(text) {
            let _ = event.trigger.title.len();
            let _ = event.action.as_deref();
        }
    }
});

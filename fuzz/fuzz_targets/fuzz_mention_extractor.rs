#![no_main]

use collabgate_core::mention::{extract_mention, find_mention};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let title = String::from_utf8_lossy(data);

    match find_mention(&title) {
        Some(user) => {
            assert!(!user.is_empty());
            assert!(user.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'));
            assert!(title.contains(&format!("@{user}")));
            assert_eq!(extract_mention(&title).ok(), Some(user));
        }
        None => {
            let err = extract_mention(&title).unwrap_err();
            // Error text stays bounded for huge titles
            assert!(err.to_string().len() < 1024);
        }
    }
});

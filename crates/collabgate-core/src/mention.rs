//! `@mention` extraction from issue titles
//!
//! The requested username is the first run of ASCII letters, digits or
//! hyphens that directly follows an `@`. Scanning is zero-copy: the returned
//! slice borrows from the title.

use crate::error::{Error, Result};
use memchr::memchr_iter;

#[inline]
const fn is_login_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Find the first `@mention` in `title`, without the `@`.
///
/// An `@` followed by no login character is skipped and scanning continues,
/// so `"@ @bob"` yields `bob`. Case is preserved.
pub fn find_mention(title: &str) -> Option<&str> {
    let bytes = title.as_bytes();
    for at in memchr_iter(b'@', bytes) {
        let start = at + 1;
        let len = bytes[start..]
            .iter()
            .take_while(|&&b| is_login_byte(b))
            .count();
        if len > 0 {
            // Login bytes are ASCII, so both ends sit on char boundaries
            return Some(&title[start..start + len]);
        }
    }
    None
}

/// Extract the requested username from an issue title.
///
/// Fails with [`Error::Extraction`] when the title has no well-formed mention.
pub fn extract_mention(title: &str) -> Result<&str> {
    find_mention(title).ok_or_else(|| {
        Error::Extraction(format!(
            "issue title contains no @mention: {:?}",
            truncate(title, 120)
        ))
    })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

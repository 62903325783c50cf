//! Error types for collabgate-core

use std::fmt;

/// Result type alias for collabgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for collabgate operations
#[derive(Debug)]
pub enum Error {
    /// Issue title carries no well-formed `@mention`
    Extraction(String),

    /// Invalid configuration
    Config(String),

    /// Credential exchange or token error
    Auth(String),

    /// I/O error
    Io(std::io::Error),

    /// Runtime error (Tokio, threading, etc.)
    Runtime(String),

    /// HTTP/API error
    Http(String),

    /// API rate limit exceeded
    RateLimitExceeded(String),

    /// YAML parsing error
    Yaml(String),

    /// GitHub event parsing error
    EventParse(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Extraction(msg) => write!(f, "Mention extraction error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Auth(msg) => write!(f, "Authentication error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Error::Http(msg) => write!(f, "HTTP error: {}", msg),
            Error::RateLimitExceeded(msg) => write!(f, "Rate limit exceeded: {}", msg),
            Error::Yaml(msg) => write!(f, "YAML error: {}", msg),
            Error::EventParse(msg) => write!(f, "Event parse error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so query strings never leak into logs
        Error::Http(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Auth(format!("JWT error: {}", err))
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Mention extraction error
    Extraction,
    /// Configuration error
    Config,
    /// Authentication error
    Auth,
    /// I/O operation error
    Io,
    /// Runtime error
    Runtime,
    /// HTTP/API error
    Http,
    /// API rate limit exceeded
    RateLimitExceeded,
    /// YAML parsing error
    Yaml,
    /// GitHub event parsing error
    EventParse,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind (zero allocation)
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Extraction(_) => ErrorKind::Extraction,
            Error::Config(_) => ErrorKind::Config,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Io(_) => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Http(_) => ErrorKind::Http,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::Yaml(_) => ErrorKind::Yaml,
            Error::EventParse(_) => ErrorKind::EventParse,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Borrow the error message
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Extraction(msg)
            | Error::Config(msg)
            | Error::Auth(msg)
            | Error::Runtime(msg)
            | Error::Http(msg)
            | Error::RateLimitExceeded(msg)
            | Error::Yaml(msg)
            | Error::EventParse(msg)
            | Error::Other(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let err = Error::Extraction("no mention".to_string());
        let k = err.kind();
        let k2 = k; // Copy, no move
        assert_eq!(k, k2);
    }

    #[test]
    fn test_error_kind_repr_u8() {
        assert_eq!(std::mem::size_of::<ErrorKind>(), 1);
    }

    #[test]
    fn test_error_message_borrows() {
        let err = Error::Config("bad config".to_string());
        let msg: &str = err.message();
        assert_eq!(msg, "bad config");
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::Extraction("title has no mention".into()).to_string(),
            "Mention extraction error: title has no mention"
        );
        assert_eq!(
            Error::RateLimitExceeded("remaining 0".into()).to_string(),
            "Rate limit exceeded: remaining 0"
        );
    }

    #[test]
    fn test_all_error_variants_have_kind() {
        let cases: Vec<(Error, ErrorKind)> = vec![
            (Error::Extraction("e".into()), ErrorKind::Extraction),
            (Error::Config("c".into()), ErrorKind::Config),
            (Error::Auth("a".into()), ErrorKind::Auth),
            (Error::Io(std::io::Error::other("io")), ErrorKind::Io),
            (Error::Runtime("r".into()), ErrorKind::Runtime),
            (Error::Http("h".into()), ErrorKind::Http),
            (
                Error::RateLimitExceeded("rl".into()),
                ErrorKind::RateLimitExceeded,
            ),
            (Error::Yaml("y".into()), ErrorKind::Yaml),
            (Error::EventParse("ep".into()), ErrorKind::EventParse),
            (Error::Other("o".into()), ErrorKind::Other),
        ];

        for (err, expected_kind) in cases {
            assert_eq!(err.kind(), expected_kind, "Mismatch for {:?}", err);
        }
    }

    #[test]
    fn test_io_error_exposes_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::other("disk"));
        assert!(err.source().is_some());
        assert!(Error::Http("x".into()).source().is_none());
    }
}

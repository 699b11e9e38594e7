//! Error types for rewrite operations

use thiserror::Error;

/// Errors that can occur while rewriting HTML into email-safe markup
///
/// Stylesheet problems never show up here: malformed CSS is skipped and
/// missing selectors resolve to empty styles.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Input exceeds the configured size limit
    #[error("Input too large: {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
    /// The html5ever serializer failed to write a node
    #[error("Serialization failed: {0}")]
    Serialize(#[from] std::io::Error),
    /// Serialized output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// The parsed document has no body element to host the fragment
    #[error("Parsed document has no body element")]
    MissingBody,
}

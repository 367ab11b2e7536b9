//! Chapter File Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A chapter codec error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for chapter codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The `##正文` line that opens the body section is missing.
    #[display("malformed chapter file: missing body marker")]
    MissingBodyMarker,
    /// The `#标题` line, or the title line following it, is missing or
    /// placed after the body marker.
    #[display("malformed chapter file: missing title")]
    MissingTitle,
    /// Titles occupy exactly one line, so they cannot contain line breaks.
    #[display("chapter title contains a line break")]
    InvalidTitle,
}

impl ErrorKind {
    /// Returns `true` if the file contents, rather than the caller's input,
    /// are at fault.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MissingBodyMarker | Self::MissingTitle)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The text is either well-formed or it isn't.
        false
    }
}

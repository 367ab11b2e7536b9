//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The index file exists but couldn't be read, or isn't a list of works.
    #[display("index unreadable: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// The index couldn't be written (disk full, permissions, ...).
    #[display("index write failed: {}", _0.display())]
    WriteFailed(#[error(not(source))] PathBuf),
    /// Two works in the index share a code.
    #[display("duplicate work code: {_0}")]
    DuplicateCode(#[error(not(source))] String),
    /// A work code that isn't a plain alphanumeric directory name.
    #[display("invalid work code: {_0:?}")]
    InvalidCode(#[error(not(source))] String),
    /// A chapter's file path escapes the storage root or its work directory.
    #[display("chapter path outside of work {_0}: {}", _1.display())]
    ChapterPath(#[error(not(source))] String, PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteFailed(_))
    }
}

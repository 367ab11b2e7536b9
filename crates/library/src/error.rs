//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Failures from the index, storage and
//! chapter crates are kept as children in the error tree.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What a 1-based position refers to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    #[display("work")]
    Work,
    #[display("chapter")]
    Chapter,
}

/// Classifies library failures by what the caller can do about them.
///
/// ### Selection Errors
/// Recoverable by asking the user again, nothing was touched.
/// - [`ErrorKind::OutOfRange`]
/// - [`ErrorKind::InvalidSelector`]
/// - [`ErrorKind::InvalidTitle`]
///
/// ### Storage Errors
/// The operation was aborted before the index changed.
/// - [`ErrorKind::IndexUnreadable`]
/// - [`ErrorKind::IndexWriteFailed`]
/// - [`ErrorKind::MalformedChapterFile`]
/// - [`ErrorKind::ChapterFileReadFailed`]
/// - [`ErrorKind::ChapterFileWriteFailed`]
/// - [`ErrorKind::RemoveFailed`]
/// - [`ErrorKind::CreateWorkFailed`]
/// - [`ErrorKind::CodeExhausted`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A 1-based position outside `1..=len`.
    #[display("{target} {position} does not exist (expected 1 to {len})")]
    OutOfRange { target: Target, position: usize, len: usize },
    /// Text that isn't a position at all.
    #[display("not a valid number: {_0:?}")]
    InvalidSelector(#[error(not(source))] String),
    /// Chapter titles have to fit on one line.
    #[display("chapter titles cannot contain line breaks")]
    InvalidTitle,
    /// The index exists but can't be loaded.
    #[display("could not read the index")]
    IndexUnreadable,
    /// The index couldn't be saved; the operation was rolled back where possible.
    #[display("could not save the index")]
    IndexWriteFailed,
    /// A chapter file doesn't follow the chapter layout.
    #[display("malformed chapter file: {}", _0.display())]
    MalformedChapterFile(#[error(not(source))] PathBuf),
    #[display("could not read chapter file: {}", _0.display())]
    ChapterFileReadFailed(#[error(not(source))] PathBuf),
    #[display("could not write chapter file: {}", _0.display())]
    ChapterFileWriteFailed(#[error(not(source))] PathBuf),
    /// A file or directory couldn't be deleted.
    #[display("could not remove: {}", _0.display())]
    RemoveFailed(#[error(not(source))] PathBuf),
    #[display("could not create work directory: {}", _0.display())]
    CreateWorkFailed(#[error(not(source))] PathBuf),
    /// No unused work code could be generated.
    #[display("could not generate an unused work code")]
    CodeExhausted,
}

impl ErrorKind {
    /// Returns `true` for errors caused by the user's selection or input,
    /// which are safe to re-prompt for.
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::InvalidSelector(_) | Self::InvalidTitle)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IndexWriteFailed | Self::ChapterFileWriteFailed(_) | Self::RemoveFailed(_) | Self::CreateWorkFailed(_)
        )
    }
}

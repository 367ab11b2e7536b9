//! Storage layout and path safety.
//!
//! Everything quire writes lives below a single storage root:
//!
//! ```text
//! <root>/index.json
//! <root>/<code>/<stem>.txt
//! ```
//!
//! The mapping functions here are pure; they never touch the filesystem.
//! Paths read back from the index are relative to the root and must pass
//! [`validate`] before they are joined onto it.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// File name of the index inside the storage root.
pub const INDEX_FILE_NAME: &str = "index.json";
/// Extension of chapter files.
pub const CHAPTER_EXTENSION: &str = "txt";
/// Stem used when a title has no usable characters left after sanitizing.
pub const FALLBACK_STEM: &str = "chapter";
/// Longest stem (in bytes) produced by [`chapter_file_stem`], leaving room
/// for the collision suffix and extension under common 255-byte limits.
pub const MAX_STEM_BYTES: usize = 200;

/// Characters that are either path separators or reserved on at least one
/// mainstream filesystem.
const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Device names Windows refuses as file stems, whatever the case or extension.
const RESERVED_STEMS: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1", "LPT2",
    "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Returns `true` if `code` is a plain alphanumeric name, safe to use as a
/// single directory below the storage root.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Directory holding every chapter file of the work with this code.
pub fn work_dir(root: impl AsRef<Path>, code: &str) -> PathBuf {
    root.as_ref().join(code)
}

/// Location of a chapter file, given the stem chosen for it.
pub fn chapter_file(root: impl AsRef<Path>, code: &str, stem: &str) -> PathBuf {
    work_dir(root, code).join(format!("{stem}.{CHAPTER_EXTENSION}"))
}

/// Location of the chapter file relative to the storage root, as stored in
/// the index.
pub fn relative_chapter_file(code: &str, stem: &str) -> PathBuf {
    chapter_file("", code, stem)
}

/// Location of the JSON index.
pub fn index_file(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(INDEX_FILE_NAME)
}

/// Picks a safe file stem for a chapter titled `title`.
///
/// The title is kept verbatim whenever it is already a valid single file name,
/// so a chapter called `Ch1` lives in `Ch1.txt`. Separators, reserved and
/// control characters become `_`, surrounding dots and whitespace are dropped,
/// and the result is cut at a char boundary. Windows device names such as
/// `CON` or `nul` get a trailing `_`. Stems listed in `taken` (compared
/// case-insensitively, for the benefit of case-folding filesystems) get a
/// numeric suffix: `Ch1`, `Ch1-2`, `Ch1-3`...
///
/// # Examples
///
/// ```
/// use quire_storage::chapter_file_stem;
/// assert_eq!(chapter_file_stem("Ch1", Vec::<&str>::new()), "Ch1");
/// assert_eq!(chapter_file_stem("第一章", Vec::<&str>::new()), "第一章");
/// assert_eq!(chapter_file_stem("../etc/passwd", Vec::<&str>::new()), "_etc_passwd");
/// assert_eq!(chapter_file_stem("Ch1", ["ch1"]), "Ch1-2");
/// ```
pub fn chapter_file_stem<I, S>(title: &str, taken: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let taken: Vec<String> = taken.into_iter().map(|s| s.as_ref().to_lowercase()).collect();
    let base = sanitize(title);
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}

fn sanitize(title: &str) -> String {
    let replaced: String =
        title.chars().map(|c| if c.is_control() || RESERVED.contains(&c) { '_' } else { c }).collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let truncated = &trimmed[..trimmed.floor_char_boundary(MAX_STEM_BYTES)];
    // Truncation may have exposed trailing whitespace or dots again.
    let truncated = truncated.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    match truncated.is_empty() {
        true => FALLBACK_STEM.to_string(),
        false if RESERVED_STEMS.iter().any(|r| r.eq_ignore_ascii_case(truncated)) => format!("{truncated}_"),
        false => truncated.to_string(),
    }
}

/// Validates a storage path for security and correctness.
/// Ensures that paths don't escape the storage root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quire_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("Ab3dE9xZ/Ch1.txt").is_ok());
/// assert!(validate_path("a/../Ch1.txt").is_ok()); // (never leaves storage root)
/// // Invalid paths
/// assert!(validate_path("../index.json").is_err());
/// assert!(validate_path("a/../../b").is_err()); // (leaves storage root)
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("wrong/../Ab3dE9xZ/./Ch1.txt/").unwrap(),
///     Path::new("Ab3dE9xZ/Ch1.txt")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls, reject them explicitly.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Joins a path read from the index onto the storage root, after validating it.
pub fn resolve(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(root.as_ref().join(validate(relative)?))
}

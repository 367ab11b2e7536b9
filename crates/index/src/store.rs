//! Loading and saving the index file.
//!
//! The index is always read and written as a whole. Saves go through a
//! temporary file and a rename, so a failed save leaves the previous index
//! in place.

use crate::error::{ErrorKind, Result};
use crate::models::Work;
use exn::ResultExt;
use quire_storage::error::Result as StorageResult;
use quire_storage::{fs, index_file, is_valid_code, validate_path};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// Reads and writes `<root>/index.json`.
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}
impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root the index lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the index file.
    pub fn path(&self) -> PathBuf {
        index_file(&self.root)
    }

    /// Loads every work in the index.
    ///
    /// A missing index file is a fresh library and yields an empty list. An
    /// index that exists but can't be read, isn't valid JSON, doesn't match
    /// the work schema, or breaks an index invariant (codes that aren't plain
    /// directory names, duplicate codes, chapter files outside their work
    /// directory) is [`Unreadable`](ErrorKind::Unreadable).
    #[instrument(skip(self), fields(path = %self.path().display()))]
    pub fn load(&self) -> Result<Vec<Work>> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                tracing::info!("No index found; starting with an empty library");
                return Ok(Vec::new());
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::Unreadable(path)),
        };
        let mut works: Vec<Work> = serde_json::from_str(&text).or_raise(|| ErrorKind::Unreadable(path.clone()))?;
        check(&mut works).or_raise(|| ErrorKind::Unreadable(path))?;
        tracing::debug!(works = works.len(), "Loaded index");
        Ok(works)
    }

    /// Replaces the index with `works`, creating the storage root if needed.
    ///
    /// The JSON is pretty-printed with four-space indentation and keeps
    /// non-ASCII text as-is, so the file stays readable by hand.
    #[instrument(skip_all, fields(path = %self.path().display(), works = works.len()))]
    pub fn save(&self, works: &[Work]) -> Result<()> {
        let path = self.path();
        let json = to_json(works).or_raise(|| ErrorKind::WriteFailed(path.clone()))?;
        fs::write_atomic(&path, &json).or_raise(|| ErrorKind::WriteFailed(path))?;
        tracing::debug!("Saved index");
        Ok(())
    }
}

fn to_json(works: &[Work]) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    works.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Enforces the invariants the rest of the library relies on, normalizing
/// chapter paths on the way.
fn check(works: &mut [Work]) -> Result<()> {
    let mut codes = HashSet::new();
    for work in works.iter_mut() {
        if !is_valid_code(work.code()) {
            exn::bail!(ErrorKind::InvalidCode(work.code().to_string()));
        }
        if !codes.insert(work.code().to_string()) {
            exn::bail!(ErrorKind::DuplicateCode(work.code().to_string()));
        }
        let code = work.code().to_string();
        for chapter in work.chapters.iter_mut() {
            chapter.file_path = normalize_chapter_path(&code, &chapter.file_path)
                .or_raise(|| ErrorKind::ChapterPath(code.clone(), chapter.file_path.clone()))?;
        }
    }
    Ok(())
}

/// Brings a stored chapter path into `<code>/<file>` form.
///
/// Libraries written by earlier versions stored paths including the storage
/// root (`data/<code>/<file>`); everything up to the work's directory is
/// dropped. Paths that don't end in exactly `<code>/<file>` are rejected.
fn normalize_chapter_path(code: &str, stored: &Path) -> StorageResult<PathBuf> {
    let validated = validate_path(stored)?;
    let components: Vec<&OsStr> = validated
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();
    match components.as_slice() {
        [.., dir, file] if *dir == OsStr::new(code) => Ok(Path::new(dir).join(file)),
        _ => exn::bail!(quire_storage::error::ErrorKind::InvalidPath(stored.to_path_buf())),
    }
}

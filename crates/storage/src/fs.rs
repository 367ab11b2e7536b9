//! Local filesystem operations.
//!
//! Thin, synchronous wrappers around [`std::fs`] that classify I/O failures
//! into [`ErrorKind`]s carrying the offending path. Every handle is opened and
//! closed inside the call, so nothing leaks on error paths.

use crate::error::{ErrorKind, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Create a single directory. Fails with [`AlreadyExists`](ErrorKind::AlreadyExists)
/// if something is already there; the parent must exist.
pub fn create_dir(path: &Path) -> Result<()> {
    Ok(fs::create_dir(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Create a directory and all of its missing parents.
pub fn create_dir_all(path: &Path) -> Result<()> {
    Ok(fs::create_dir_all(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Returns `true` if anything (file, directory, ...) exists at `path`.
pub fn exists(path: &Path) -> Result<bool> {
    Ok(fs::exists(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Read a whole UTF-8 file.
pub fn read_to_string(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Create or truncate a file and write `data` to it, flushed to disk before
/// returning.
pub fn write(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path).map_err(|e| ErrorKind::from_io(e, path))?;
    file.write_all(data).map_err(|e| ErrorKind::from_io(e, path))?;
    Ok(file.sync_all().map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Replace the file at `path` in one step: the data is written to a temporary
/// file in the same directory and renamed over the target, so readers see
/// either the old or the new contents, never a torn write.
///
/// The parent directory is created if it doesn't exist yet.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(parent)?;
    let mut temp = NamedTempFile::new_in(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
    temp.write_all(data).map_err(|e| ErrorKind::from_io(e, temp.path()))?;
    temp.as_file().sync_all().map_err(|e| ErrorKind::from_io(e, temp.path()))?;
    // On failure the temporary file is dropped (and removed) with the error.
    temp.persist(path).map_err(|e| ErrorKind::from_io(e.error, path))?;
    tracing::trace!(path = %path.display(), bytes = data.len(), "Atomically replaced file");
    Ok(())
}

/// Delete a file. Returns [`NotFound`](ErrorKind::NotFound) if it doesn't exist.
pub fn remove_file(path: &Path) -> Result<()> {
    Ok(fs::remove_file(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Delete an empty directory. Returns [`NotEmpty`](ErrorKind::NotEmpty) if
/// anything is left inside.
pub fn remove_dir(path: &Path) -> Result<()> {
    Ok(fs::remove_dir(path).map_err(|e| ErrorKind::from_io(e, path))?)
}

/// List the direct children of a directory, sorted for deterministic output.
///
/// Returns [`NotFound`](ErrorKind::NotFound) if the directory doesn't exist.
pub fn list_dir(path: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(path).map_err(|e| ErrorKind::from_io(e, path))?;
    let mut children = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| ErrorKind::from_io(e, path))?;
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Deref;

    #[test]
    fn test_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Ch1.txt");
        write(&path, "#标题\nCh1".as_bytes()).unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "#标题\nCh1");
        // Overwrites, doesn't append
        write(&path, b"short").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/root/index.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "[]");
        write_atomic(&path, b"[1]").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "[1]");
        // Only the target is left behind, no temporary files.
        assert_eq!(list_dir(path.parent().unwrap()).unwrap(), vec![path.clone()]);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = read_to_string(&temp_dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_create_dir_twice() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Ab3dE9xZ");
        create_dir(&path).unwrap();
        assert!(exists(&path).unwrap());
        let err = create_dir(&path).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::AlreadyExists(_)));
    }

    #[test]
    fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("Ab3dE9xZ");
        create_dir(&dir).unwrap();
        let file = dir.join("Ch1.txt");
        write(&file, b"data").unwrap();
        let err = remove_dir(&dir).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::NotEmpty(_) | ErrorKind::Io(_)));
        remove_file(&file).unwrap();
        assert!(remove_file(&file).unwrap_err().is_not_found());
        remove_dir(&dir).unwrap();
        assert!(!exists(&dir).unwrap());
    }

    #[test]
    fn test_list_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(&temp_dir.path().join("b.txt"), b"").unwrap();
        write(&temp_dir.path().join("a.txt"), b"").unwrap();
        let listed = list_dir(temp_dir.path()).unwrap();
        assert_eq!(listed, vec![temp_dir.path().join("a.txt"), temp_dir.path().join("b.txt")]);
        assert!(list_dir(&temp_dir.path().join("missing")).unwrap_err().is_not_found());
    }
}

//! The library service.
//!
//! [`Library`] owns the in-memory list of works and is the only thing that
//! touches the index or the chapter files. Every operation runs to completion
//! synchronously and saves the whole index before returning.
//!
//! Ordering rules keep the index from ever pointing at something that isn't
//! on disk:
//!
//! - things are **created** on disk first and recorded in the index after,
//! - things are **removed** from disk first and dropped from the index after,
//!   and any removal failure aborts the operation before the index changes.
//!
//! When saving the index fails, in-memory changes that can be undone are
//! undone, so memory keeps matching the index on disk.

use crate::code::{CodeGenerator, RandomCode};
use crate::error::{Error, ErrorKind, Result, Target};
use crate::selector::to_index;
use exn::ResultExt;
use quire_chapter::error::Error as ChapterError;
use quire_chapter::{ChapterText, decode, encode, rewrite_body, rewrite_title};
use quire_index::{Chapter, IndexStore, Work};
use quire_storage::{chapter_file_stem, fs, is_valid_code, relative_chapter_file, resolve, work_dir};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Maximum number of codes drawn before giving up on [`Library::create_work`].
pub const MAX_CODE_ATTEMPTS: usize = 16;

/// Whether an edit changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// The new value was blank, nothing was touched.
    Unchanged,
    /// The chapter file was rewritten and the index saved.
    Updated,
}
impl Edit {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// A library of works rooted at a storage directory.
///
/// Works and chapters are addressed by 1-based position, in index order.
pub struct Library {
    store: IndexStore,
    works: Vec<Work>,
    codes: Box<dyn CodeGenerator>,
}
impl Library {
    /// Opens the library at `root`, loading its index. A root without an
    /// index is an empty library; nothing is written until the first change.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_generator(root, RandomCode)
    }

    /// Like [`open`](Self::open), drawing work codes from `codes`.
    #[instrument(skip_all)]
    pub fn with_generator(root: impl Into<PathBuf>, codes: impl CodeGenerator + 'static) -> Result<Self> {
        let store = IndexStore::new(root);
        let works = store.load().or_raise(|| ErrorKind::IndexUnreadable)?;
        tracing::debug!(root = %store.root().display(), works = works.len(), "Opened library");
        Ok(Self { store, works, codes: Box::new(codes) })
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.works).or_raise(|| ErrorKind::IndexWriteFailed)
    }

    /// Every work, in index order.
    pub fn list_works(&self) -> &[Work] {
        &self.works
    }

    /// The work at a 1-based `position`.
    pub fn work(&self, position: usize) -> Result<&Work> {
        Ok(&self.works[to_index(Target::Work, position, self.works.len())?])
    }

    /// Creates an empty work under a fresh code.
    ///
    /// The work directory is created before the work is added to the index,
    /// so an interrupted call can leave an empty orphan directory behind but
    /// never an index entry without a directory.
    #[instrument(skip(self, description), fields(code))]
    pub fn create_work(&mut self, title: &str, description: &str) -> Result<&Work> {
        let code = self.unused_code()?;
        tracing::Span::current().record("code", code.as_str());
        let dir = work_dir(self.root(), &code);
        fs::create_dir_all(self.root()).or_raise(|| ErrorKind::CreateWorkFailed(dir.clone()))?;
        fs::create_dir(&dir).or_raise(|| ErrorKind::CreateWorkFailed(dir.clone()))?;

        self.works.push(Work::new(title, description, code));
        if let Err(e) = self.persist() {
            self.works.pop();
            if let Err(cleanup) = fs::remove_dir(&dir) {
                tracing::warn!(path = %dir.display(), error = %cleanup, "Could not remove directory of unsaved work");
            }
            return Err(e);
        }
        tracing::info!(title, "Created work");
        Ok(&self.works[self.works.len() - 1])
    }

    /// Draws codes until one is used neither by a work in the index nor by a
    /// directory in the storage root (left behind by an interrupted create).
    fn unused_code(&mut self) -> Result<String> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.generate();
            if !is_valid_code(&code) {
                tracing::warn!(attempt, %code, "Generated work code is not a safe directory name");
                continue;
            }
            let dir = work_dir(self.root(), &code);
            let on_disk = fs::exists(&dir).or_raise(|| ErrorKind::CreateWorkFailed(dir.clone()))?;
            if !on_disk && !self.works.iter().any(|w| w.code() == code) {
                return Ok(code);
            }
            tracing::debug!(attempt, %code, "Work code already in use; generating another");
        }
        exn::bail!(ErrorKind::CodeExhausted)
    }

    /// Deletes the work at `position` with all of its files.
    ///
    /// Every file in the work directory is removed, then the directory, and
    /// only then the index entry. If anything can't be removed the index is
    /// left as it was and the failure is returned.
    #[instrument(skip(self))]
    pub fn delete_work(&mut self, position: usize) -> Result<Work> {
        let index = to_index(Target::Work, position, self.works.len())?;
        let dir = work_dir(self.root(), self.works[index].code());
        match fs::list_dir(&dir) {
            Ok(entries) => {
                for entry in entries {
                    fs::remove_file(&entry).or_raise(|| ErrorKind::RemoveFailed(entry.clone()))?;
                }
                fs::remove_dir(&dir).or_raise(|| ErrorKind::RemoveFailed(dir.clone()))?;
            },
            Err(e) if e.is_not_found() => {
                tracing::warn!(path = %dir.display(), "Work directory already missing");
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::RemoveFailed(dir)),
        }
        // The files are gone at this point, so a failed save can't be undone
        // by putting the work back. The next successful save catches up.
        let work = self.works.remove(index);
        self.persist()?;
        tracing::info!(code = work.code(), title = %work.title, "Deleted work");
        Ok(work)
    }

    /// Chapters of the work at `work`, in order.
    pub fn list_chapters(&self, work: usize) -> Result<&[Chapter]> {
        Ok(&self.work(work)?.chapters)
    }

    /// Index of the work, and of the chapter within it.
    fn locate(&self, work: usize, chapter: usize) -> Result<(usize, usize)> {
        let w = to_index(Target::Work, work, self.works.len())?;
        let c = to_index(Target::Chapter, chapter, self.works[w].chapters.len())?;
        Ok((w, c))
    }

    /// Absolute location of a chapter's file.
    fn chapter_path(&self, w: usize, c: usize) -> Result<PathBuf> {
        let relative = &self.works[w].chapters[c].file_path;
        resolve(self.root(), relative).or_raise(|| ErrorKind::ChapterFileReadFailed(relative.clone()))
    }

    fn read_file(path: &Path) -> Result<String> {
        fs::read_to_string(path).or_raise(|| ErrorKind::ChapterFileReadFailed(path.to_path_buf()))
    }

    /// Title and body of a chapter, as stored in its file.
    #[instrument(skip(self))]
    pub fn read_chapter(&self, work: usize, chapter: usize) -> Result<ChapterText> {
        let (w, c) = self.locate(work, chapter)?;
        let path = self.chapter_path(w, c)?;
        let text = Self::read_file(&path)?;
        decode(&text).or_raise(|| ErrorKind::MalformedChapterFile(path))
    }

    /// Appends a chapter to the work at `work`.
    ///
    /// The chapter file is written first; the work only gains the chapter once
    /// the file is on disk. Its file name comes from the title, made safe and
    /// unique within the work, and is recorded in the index.
    #[instrument(skip(self, body), fields(path))]
    pub fn add_chapter(&mut self, work: usize, title: &str, body: &str) -> Result<&Chapter> {
        let w = to_index(Target::Work, work, self.works.len())?;
        let text = encode(title, body).or_raise(|| ErrorKind::InvalidTitle)?;
        let code = self.works[w].code().to_string();
        let dir = work_dir(self.root(), &code);

        // Stems of stray files count as taken too, so nothing gets overwritten.
        let on_disk = match fs::list_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e).or_raise(|| ErrorKind::ChapterFileWriteFailed(dir)),
        };
        let taken = self.works[w].stems().chain(on_disk.iter().filter_map(|p| p.file_stem()?.to_str()));
        let stem = chapter_file_stem(title, taken);
        let relative = relative_chapter_file(&code, &stem);
        let path = self.root().join(&relative);
        tracing::Span::current().record("path", tracing::field::display(relative.display()));

        fs::write(&path, text.as_bytes()).or_raise(|| ErrorKind::ChapterFileWriteFailed(path.clone()))?;
        self.works[w].chapters.push(Chapter::new(title, relative));
        if let Err(e) = self.persist() {
            self.works[w].chapters.pop();
            if let Err(cleanup) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %cleanup, "Could not remove file of unsaved chapter");
            }
            return Err(e);
        }
        tracing::info!(%code, "Added chapter");
        let chapters = &self.works[w].chapters;
        Ok(&chapters[chapters.len() - 1])
    }

    /// Renames a chapter. The title line of its file is rewritten in place;
    /// the file keeps its name.
    ///
    /// A title that is blank after trimming is ignored and reported as
    /// [`Edit::Unchanged`].
    #[instrument(skip(self))]
    pub fn edit_chapter_title(&mut self, work: usize, chapter: usize, new_title: &str) -> Result<Edit> {
        let (w, c) = self.locate(work, chapter)?;
        let new_title = new_title.trim();
        if new_title.is_empty() {
            tracing::debug!("Blank title; chapter left unchanged");
            return Ok(Edit::Unchanged);
        }
        let path = self.chapter_path(w, c)?;
        let original = Self::read_file(&path)?;
        let rewritten = rewrite_title(&original, new_title).map_err(|e| codec_error(e, &path))?;
        fs::write_atomic(&path, rewritten.as_bytes()).or_raise(|| ErrorKind::ChapterFileWriteFailed(path.clone()))?;

        let previous = std::mem::replace(&mut self.works[w].chapters[c].title, new_title.to_string());
        if let Err(e) = self.persist() {
            self.works[w].chapters[c].title = previous;
            restore(&path, &original);
            return Err(e);
        }
        tracing::info!(%previous, "Renamed chapter");
        Ok(Edit::Updated)
    }

    /// Replaces the body of a chapter. The title line is left alone.
    ///
    /// A body that is blank after trimming is ignored and reported as
    /// [`Edit::Unchanged`].
    #[instrument(skip(self, new_body))]
    pub fn edit_chapter_body(&mut self, work: usize, chapter: usize, new_body: &str) -> Result<Edit> {
        let (w, c) = self.locate(work, chapter)?;
        let new_body = new_body.trim();
        if new_body.is_empty() {
            tracing::debug!("Blank body; chapter left unchanged");
            return Ok(Edit::Unchanged);
        }
        let path = self.chapter_path(w, c)?;
        let original = Self::read_file(&path)?;
        let rewritten = rewrite_body(&original, new_body).map_err(|e| codec_error(e, &path))?;
        fs::write_atomic(&path, rewritten.as_bytes()).or_raise(|| ErrorKind::ChapterFileWriteFailed(path.clone()))?;

        if let Err(e) = self.persist() {
            restore(&path, &original);
            return Err(e);
        }
        tracing::info!(bytes = new_body.len(), "Replaced chapter body");
        Ok(Edit::Updated)
    }

    /// Deletes a chapter and its file.
    ///
    /// The file goes first; if it can't be removed the work is left as it was.
    #[instrument(skip(self))]
    pub fn delete_chapter(&mut self, work: usize, chapter: usize) -> Result<Chapter> {
        let (w, c) = self.locate(work, chapter)?;
        let path = self.chapter_path(w, c)?;
        match fs::remove_file(&path) {
            Ok(()) => {},
            Err(e) if e.is_not_found() => tracing::warn!(path = %path.display(), "Chapter file already missing"),
            Err(e) => return Err(e).or_raise(|| ErrorKind::RemoveFailed(path)),
        }
        // As with works, the file is gone and the chapter stays gone even if
        // the save fails.
        let removed = self.works[w].chapters.remove(c);
        self.persist()?;
        tracing::info!(title = %removed.title, "Deleted chapter");
        Ok(removed)
    }
}

/// Sorts a codec failure into bad input (the new title) or a bad file.
#[track_caller]
fn codec_error(e: ChapterError, path: &Path) -> Error {
    match e.is_malformed() {
        true => e.raise(ErrorKind::MalformedChapterFile(path.to_path_buf())),
        false => e.raise(ErrorKind::InvalidTitle),
    }
}

/// Puts a chapter file back after the index failed to save. Failing to do so
/// is logged; the save error is what gets reported.
fn restore(path: &Path, original: &str) {
    if let Err(e) = fs::write_atomic(path, original.as_bytes()) {
        tracing::warn!(path = %path.display(), error = %e, "Could not restore chapter file after failed save");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ops::Deref;
    use tempfile::TempDir;

    /// A library in a fresh temporary root, handing out `Code0001`,
    /// `Code0002`, ... as work codes.
    fn library() -> (TempDir, Library) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut n = 0;
        let codes = move || {
            n += 1;
            format!("Code{n:04}")
        };
        let library = Library::with_generator(temp_dir.path().join("data"), codes).unwrap();
        (temp_dir, library)
    }

    fn read(library: &Library, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(library.root().join(relative)).unwrap()
    }

    /// Makes every following index save fail by putting a directory where the
    /// index file goes.
    fn break_index(library: &Library) {
        std::fs::create_dir_all(library.root().join("index.json")).unwrap();
    }

    #[test]
    fn test_open_without_index_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let library = Library::open(temp_dir.path().join("data")).unwrap();
        assert!(library.list_works().is_empty());
        assert!(!temp_dir.path().join("data").exists());
    }

    #[test]
    fn test_changes_survive_reopening() {
        let (_temp_dir, mut library) = library();
        library.create_work("Moonlight", "a story").unwrap();
        library.create_work("月光", "").unwrap();
        library.add_chapter(2, "第一章", "月光洒在湖面上。").unwrap();
        library.edit_chapter_title(2, 1, "序章").unwrap();

        let reopened = Library::open(library.root()).unwrap();
        assert_eq!(reopened.list_works(), library.list_works());
        assert_eq!(reopened.work(2).unwrap().chapters[0].title, "序章");
        assert_eq!(reopened.read_chapter(2, 1).unwrap(), ChapterText::new("序章", "月光洒在湖面上。"));
    }

    #[test]
    fn test_unreadable_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("index.json"), "not json").unwrap();
        let err = Library::open(temp_dir.path()).err().unwrap();
        assert!(matches!(err.deref(), ErrorKind::IndexUnreadable));
    }

    #[test]
    fn test_codes_skip_collisions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("data");
        // A directory left behind by an interrupted create also counts as taken.
        std::fs::create_dir_all(root.join("Orphan01")).unwrap();
        let mut draws = ["Dupe0001", "Dupe0001", "bad/code", "Orphan01", "Fresh001"].into_iter();
        let codes = move || draws.next().map(str::to_string).unwrap_or_default();
        let mut library = Library::with_generator(&root, codes).unwrap();

        assert_eq!(library.create_work("A", "").unwrap().code(), "Dupe0001");
        assert_eq!(library.create_work("B", "").unwrap().code(), "Fresh001");
    }

    #[test]
    fn test_code_exhaustion() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut library = Library::with_generator(temp_dir.path(), || "Same0001".to_string()).unwrap();
        library.create_work("A", "").unwrap();
        let err = library.create_work("B", "").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::CodeExhausted));
        assert_eq!(library.list_works().len(), 1);
    }

    #[test]
    fn test_create_work_rolls_back_on_failed_save() {
        let (_temp_dir, mut library) = library();
        std::fs::create_dir_all(library.root()).unwrap();
        break_index(&library);
        let err = library.create_work("Moonlight", "").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::IndexWriteFailed));
        assert!(library.list_works().is_empty());
        assert!(!library.root().join("Code0001").exists());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn test_out_of_range(#[case] position: usize) {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        let before = std::fs::read_to_string(library.root().join("index.json")).unwrap();

        let is_out_of_range = |err: Error| matches!(err.deref(), ErrorKind::OutOfRange { .. });
        assert!(is_out_of_range(library.work(position).unwrap_err()));
        assert!(is_out_of_range(library.delete_work(position).unwrap_err()));
        assert!(is_out_of_range(library.add_chapter(position, "Ch2", "x").unwrap_err()));
        assert!(is_out_of_range(library.delete_chapter(1, position).unwrap_err()));
        assert!(is_out_of_range(library.read_chapter(1, position).unwrap_err()));
        assert!(is_out_of_range(library.edit_chapter_title(1, position, "x").unwrap_err()));
        assert!(is_out_of_range(library.edit_chapter_body(1, position, "x").unwrap_err()));

        assert_eq!(std::fs::read_to_string(library.root().join("index.json")).unwrap(), before);
        assert_eq!(library.list_chapters(1).unwrap().len(), 1);
    }

    #[test]
    fn test_chapter_file_names() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        let paths: Vec<PathBuf> = ["Ch1", "Ch1", "a/b", "", "第一章"]
            .into_iter()
            .map(|title| library.add_chapter(1, title, "x").unwrap().file_path.clone())
            .collect();
        let expected = ["Ch1.txt", "Ch1-2.txt", "a_b.txt", "chapter.txt", "第一章.txt"];
        assert_eq!(paths, expected.map(|name| Path::new("Code0001").join(name)));
        assert_eq!(library.read_chapter(1, 2).unwrap().title, "Ch1");
    }

    #[test]
    fn test_add_chapter_keeps_stray_files() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        std::fs::write(library.root().join("Code0001/Ch1.txt"), "not ours").unwrap();
        let chapter = library.add_chapter(1, "Ch1", "Hello").unwrap().clone();
        assert_eq!(chapter.file_path, Path::new("Code0001/Ch1-2.txt"));
        assert_eq!(read(&library, "Code0001/Ch1.txt"), "not ours");
    }

    #[test]
    fn test_add_chapter_rejects_multiline_title() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        let err = library.add_chapter(1, "two\nlines", "x").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::InvalidTitle));
        assert!(library.list_chapters(1).unwrap().is_empty());
        assert!(std::fs::read_dir(library.root().join("Code0001")).unwrap().next().is_none());
    }

    #[test]
    fn test_add_chapter_rolls_back_on_failed_save() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        std::fs::remove_file(library.root().join("index.json")).unwrap();
        break_index(&library);
        let err = library.add_chapter(1, "Ch1", "Hello").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::IndexWriteFailed));
        assert!(library.list_chapters(1).unwrap().is_empty());
        assert!(!library.root().join("Code0001/Ch1.txt").exists());
    }

    #[test]
    fn test_chapter_order_is_kept() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        for title in ["One", "Two", "Three", "Four"] {
            library.add_chapter(1, title, "x").unwrap();
        }
        assert_eq!(library.delete_chapter(1, 2).unwrap().title, "Two");
        let titles: Vec<&str> = library.list_chapters(1).unwrap().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["One", "Three", "Four"]);
        assert!(!library.root().join("Code0001/Two.txt").exists());
    }

    #[test]
    fn test_delete_chapter_with_missing_file() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        std::fs::remove_file(library.root().join("Code0001/Ch1.txt")).unwrap();
        library.delete_chapter(1, 1).unwrap();
        assert!(library.list_chapters(1).unwrap().is_empty());
    }

    #[test]
    fn test_delete_chapter_aborts_on_remove_failure() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        let index = read(&library, "index.json");
        let file = library.root().join("Code0001/Ch1.txt");
        std::fs::remove_file(&file).unwrap();
        std::fs::create_dir(&file).unwrap();
        std::fs::write(file.join("inside.txt"), "x").unwrap();

        let err = library.delete_chapter(1, 1).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::RemoveFailed(_)));
        assert_eq!(library.list_chapters(1).unwrap().len(), 1);
        assert_eq!(read(&library, "index.json"), index);
    }

    #[test]
    fn test_index_with_outside_code_is_refused() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("data");
        let outside = temp_dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("keep.txt"), "keep").unwrap();
        IndexStore::new(&root).save(&[Work::new("A", "", outside.to_str().unwrap())]).unwrap();

        let err = Library::open(&root).err().unwrap();
        assert!(matches!(err.deref(), ErrorKind::IndexUnreadable));
        assert!(outside.join("keep.txt").is_file());
    }

    #[test]
    fn test_delete_work_removes_everything() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.create_work("B", "").unwrap();
        library.add_chapter(1, "Ch1", "x").unwrap();
        library.add_chapter(1, "Ch2", "y").unwrap();
        std::fs::write(library.root().join("Code0001/notes.md"), "stray").unwrap();

        assert_eq!(library.delete_work(1).unwrap().title, "A");
        assert!(!library.root().join("Code0001").exists());
        assert!(library.root().join("Code0002").is_dir());
        let codes: Vec<&str> = library.list_works().iter().map(Work::code).collect();
        assert_eq!(codes, ["Code0002"]);
        let reopened = Library::open(library.root()).unwrap();
        assert_eq!(reopened.list_works(), library.list_works());
    }

    #[test]
    fn test_delete_work_with_missing_directory() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        std::fs::remove_dir(library.root().join("Code0001")).unwrap();
        library.delete_work(1).unwrap();
        assert!(library.list_works().is_empty());
    }

    #[test]
    fn test_delete_work_aborts_on_nested_directory() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "x").unwrap();
        std::fs::create_dir(library.root().join("Code0001/nested")).unwrap();
        let err = library.delete_work(1).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::RemoveFailed(_)));
        assert_eq!(library.list_works().len(), 1);
        assert_eq!(Library::open(library.root()).unwrap().list_works().len(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn test_blank_edits_change_nothing(#[case] blank: &str) {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        let file = read(&library, "Code0001/Ch1.txt");
        let index = read(&library, "index.json");

        assert_eq!(library.edit_chapter_title(1, 1, blank).unwrap(), Edit::Unchanged);
        assert_eq!(library.edit_chapter_body(1, 1, blank).unwrap(), Edit::Unchanged);
        assert_eq!(read(&library, "Code0001/Ch1.txt"), file);
        assert_eq!(read(&library, "index.json"), index);
    }

    #[test]
    fn test_edit_title() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "  Hello\n\nthere").unwrap();
        assert!(library.edit_chapter_title(1, 1, "  New title ").unwrap().is_updated());
        // The file keeps its name and its body bytes.
        assert_eq!(read(&library, "Code0001/Ch1.txt"), "#标题\nNew title\n##正文\n  Hello\n\nthere");
        assert_eq!(library.list_chapters(1).unwrap()[0].title, "New title");
        assert_eq!(library.list_chapters(1).unwrap()[0].file_path, Path::new("Code0001/Ch1.txt"));
    }

    #[test]
    fn test_edit_title_rolls_back_on_failed_save() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        std::fs::remove_file(library.root().join("index.json")).unwrap();
        break_index(&library);
        let err = library.edit_chapter_title(1, 1, "New").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::IndexWriteFailed));
        assert_eq!(library.list_chapters(1).unwrap()[0].title, "Ch1");
        assert_eq!(read(&library, "Code0001/Ch1.txt"), "#标题\nCh1\n##正文\nHello");
    }

    #[test]
    fn test_edit_body_rolls_back_on_failed_save() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        std::fs::remove_file(library.root().join("index.json")).unwrap();
        break_index(&library);
        assert!(library.edit_chapter_body(1, 1, "World").is_err());
        assert_eq!(read(&library, "Code0001/Ch1.txt"), "#标题\nCh1\n##正文\nHello");
    }

    #[test]
    fn test_malformed_chapter_file() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        std::fs::write(library.root().join("Code0001/Ch1.txt"), "no markers here").unwrap();

        let is_malformed = |err: Error| matches!(err.deref(), ErrorKind::MalformedChapterFile(_));
        assert!(is_malformed(library.read_chapter(1, 1).unwrap_err()));
        assert!(is_malformed(library.edit_chapter_title(1, 1, "New").unwrap_err()));
        assert!(is_malformed(library.edit_chapter_body(1, 1, "World").unwrap_err()));
        assert_eq!(read(&library, "Code0001/Ch1.txt"), "no markers here");
        assert_eq!(library.list_chapters(1).unwrap()[0].title, "Ch1");
    }

    #[test]
    fn test_missing_chapter_file() {
        let (_temp_dir, mut library) = library();
        library.create_work("A", "").unwrap();
        library.add_chapter(1, "Ch1", "Hello").unwrap();
        std::fs::remove_file(library.root().join("Code0001/Ch1.txt")).unwrap();
        let err = library.read_chapter(1, 1).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::ChapterFileReadFailed(_)));
        let err = library.edit_chapter_body(1, 1, "World").unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::ChapterFileReadFailed(_)));
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Index entry for a single chapter.
///
/// The `file_path` is relative to the storage root and is chosen once, when
/// the chapter is created. Renaming the chapter later only changes `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "章节标题", alias = "title")]
    pub title: String,
    #[serde(rename = "章节文件", alias = "file_path")]
    pub file_path: PathBuf,
}
impl Chapter {
    pub fn new(title: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self { title: title.into(), file_path: file_path.into() }
    }

    /// File name of the backing file without its extension.
    pub fn stem(&self) -> Option<&str> {
        self.file_path.file_stem().and_then(|s| s.to_str())
    }
}

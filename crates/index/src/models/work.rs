use crate::models::Chapter;
use serde::{Deserialize, Serialize};

/// A book: its metadata plus the ordered list of its chapters.
///
/// The `code` names the work's directory under the storage root and never
/// changes after creation, so it is only readable from outside this crate.
/// Chapter order is the display order, and the order 1-based positions refer
/// to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    #[serde(rename = "作品名", alias = "title")]
    pub title: String,
    #[serde(rename = "作品简介", alias = "description", default)]
    pub description: String,
    #[serde(rename = "作品代码", alias = "code")]
    code: String,
    #[serde(rename = "章节", alias = "chapters", default)]
    pub chapters: Vec<Chapter>,
}
impl Work {
    /// A new work with no chapters.
    pub fn new(title: impl Into<String>, description: impl Into<String>, code: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), code: code.into(), chapters: Vec::new() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// File stems already used by this work's chapters.
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().filter_map(Chapter::stem)
    }
}

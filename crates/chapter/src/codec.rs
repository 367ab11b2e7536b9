//! The on-disk chapter format.
//!
//! A chapter file holds two labelled sections, always in this order:
//!
//! ```text
//! #标题
//! <title>
//! ##正文
//! <body>
//! ```
//!
//! Parsing is line based. Both `\n` and `\r\n` line endings are understood,
//! and the rewrite functions leave every line they don't own byte-for-byte
//! intact, so files touched by other editors survive a title change.

use crate::consts::{BODY_MARKER_LINE, TITLE_MARKER_LINE};
use crate::error::{ErrorKind, Result};
use tracing::instrument;

/// Decoded contents of a chapter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterText {
    pub title: String,
    pub body: String,
}
impl ChapterText {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }

    /// Shorthand for [`encode`].
    pub fn encode(&self) -> Result<String> {
        encode(&self.title, &self.body)
    }
}

/// Line positions of a well-formed chapter file.
struct Layout<'a> {
    lines: Vec<&'a str>,
    /// Index of the line holding the title.
    title: usize,
    /// Index of the `##正文` line.
    body_marker: usize,
}
impl<'a> Layout<'a> {
    #[instrument(level = "trace", skip_all)]
    fn parse(text: &'a str) -> Result<Self> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let Some(body_marker) = lines.iter().position(|line| content(line) == BODY_MARKER_LINE) else {
            exn::bail!(ErrorKind::MissingBodyMarker);
        };
        let Some(title_marker) = lines[..body_marker].iter().position(|line| content(line) == TITLE_MARKER_LINE)
        else {
            exn::bail!(ErrorKind::MissingTitle);
        };
        let title = title_marker + 1;
        if title >= body_marker {
            exn::bail!(ErrorKind::MissingTitle);
        }
        Ok(Self { lines, title, body_marker })
    }
}

/// A line without its terminator.
fn content(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// The terminator (`""`, `"\n"` or `"\r\n"`) of a line.
fn terminator(line: &str) -> &str {
    &line[content(line).len()..]
}

/// Titles live on a single line, and that line must not be mistaken for the
/// body marker when the file is read back.
fn check_title(title: &str) -> Result<()> {
    if title.contains(['\n', '\r']) || title == BODY_MARKER_LINE {
        exn::bail!(ErrorKind::InvalidTitle);
    }
    Ok(())
}

/// Produces the file contents for a chapter. No trailing newline is added.
///
/// ```
/// assert_eq!(quire_chapter::encode("Ch1", "Hello").unwrap(), "#标题\nCh1\n##正文\nHello");
/// ```
pub fn encode(title: &str, body: &str) -> Result<String> {
    check_title(title)?;
    Ok(format!("{TITLE_MARKER_LINE}\n{title}\n{BODY_MARKER_LINE}\n{body}"))
}

/// Reads a chapter file back into its title and body.
///
/// The title is the line right after `#标题`; the body is everything after
/// the first `##正文` line, trimmed of surrounding whitespace.
#[instrument(level = "trace", skip_all, fields(size = text.len()))]
pub fn decode(text: &str) -> Result<ChapterText> {
    let layout = Layout::parse(text)?;
    let title = content(layout.lines[layout.title]).to_string();
    let body = layout.lines[layout.body_marker + 1..].concat().trim().to_string();
    Ok(ChapterText { title, body })
}

/// Replaces the title line only. Everything else, body included, is kept
/// byte-for-byte.
#[instrument(level = "trace", skip_all)]
pub fn rewrite_title(text: &str, new_title: &str) -> Result<String> {
    check_title(new_title)?;
    let layout = Layout::parse(text)?;
    let mut out = String::with_capacity(text.len() + new_title.len());
    for (i, line) in layout.lines.iter().enumerate() {
        if i == layout.title {
            out.push_str(new_title);
            out.push_str(terminator(line));
        } else {
            out.push_str(line);
        }
    }
    Ok(out)
}

/// Drops everything after the `##正文` line and writes `new_body` followed by
/// a newline in its place.
#[instrument(level = "trace", skip_all)]
pub fn rewrite_body(text: &str, new_body: &str) -> Result<String> {
    let layout = Layout::parse(text)?;
    let mut out = layout.lines[..=layout.body_marker].concat();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(new_body);
    out.push('\n');
    Ok(out)
}

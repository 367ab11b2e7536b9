//! Chapter files: one title line and a free-form body, each behind a marker
//! line. See [`encode`] for the exact layout.

mod codec;
pub mod consts;
pub mod error;

pub use crate::codec::{ChapterText, decode, encode, rewrite_body, rewrite_title};
